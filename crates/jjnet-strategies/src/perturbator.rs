//! Reference perturbators.

use jjnet_core::{HookError, Network, Perturbator, RandomSource};
use tracing::debug;

/// Leaves the network untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPerturbator;

impl Perturbator for NullPerturbator {
    fn name(&self) -> &str {
        "null"
    }
}

/// Parameters for [`StaticPerturbator`].
#[derive(Clone, Debug)]
pub struct StaticParams {
    /// Target mean of `z` over the selected contacts.
    pub average: f64,
    /// Source of the per-contact draws.
    pub rng: Box<dyn RandomSource>,
    /// Contact selection; empty selects every contact.
    pub tag_expr: String,
}

impl StaticParams {
    /// Parameters selecting every contact.
    pub fn new(average: f64, rng: Box<dyn RandomSource>) -> Self {
        Self {
            average,
            rng,
            tag_expr: String::new(),
        }
    }

    /// Restrict the perturbation to contacts matching `expr`.
    pub fn with_tag_expr(mut self, expr: impl Into<String>) -> Self {
        self.tag_expr = expr.into();
        self
    }
}

/// Assigns a fixed random bias to a set of contacts before each run.
///
/// One value is drawn per selected contact; the set is shifted so its mean
/// equals [`StaticParams::average`] exactly. Contacts outside the selection
/// keep their `z`.
#[derive(Clone, Debug)]
pub struct StaticPerturbator {
    params: StaticParams,
}

impl StaticPerturbator {
    /// A perturbator with the given parameters.
    pub fn new(params: StaticParams) -> Self {
        Self { params }
    }

    /// The perturbator's parameters.
    pub fn params(&self) -> &StaticParams {
        &self.params
    }

    /// Mutable parameters, used from the next run.
    pub fn params_mut(&mut self) -> &mut StaticParams {
        &mut self.params
    }
}

impl Perturbator for StaticPerturbator {
    fn name(&self) -> &str {
        "static"
    }

    fn before_run(
        &mut self,
        network: &mut Network,
        _start_time: f64,
        _end_time: f64,
        _dt: f64,
    ) -> Result<(), HookError> {
        let indices = network.build_contact_indices(&self.params.tag_expr)?;
        if indices.is_empty() {
            return Ok(());
        }

        let draws: Vec<f64> = indices.iter().map(|_| self.params.rng.generate()).collect();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        let shift = mean - self.params.average;
        for (&i, z) in indices.iter().zip(&draws) {
            network.contact_mut(i)?.z = z - shift;
        }

        debug!(
            selected = indices.len(),
            average = self.params.average,
            "static bias applied"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ConstRng, UniformRng};
    use jjnet_core::{Contact, Tagged};

    fn network(n: usize) -> Network {
        let mut net = Network::new();
        for i in 0..n {
            let mut c = Contact::default();
            if i % 2 == 0 {
                c.add_tag("even");
            }
            net.add_contact(c);
        }
        net
    }

    #[test]
    fn mean_of_selected_equals_average() {
        let mut net = network(6);
        let params = StaticParams::new(0.3, Box::new(UniformRng::new(0.0, 2.0))).with_tag_expr("even");
        let mut p = StaticPerturbator::new(params);
        p.before_run(&mut net, 0.0, 1.0, 0.1).unwrap();

        let selected = net.build_contact_indices("even").unwrap();
        let mean: f64 = selected
            .iter()
            .map(|&i| net.contact(i).unwrap().z)
            .sum::<f64>()
            / selected.len() as f64;
        assert!((mean - 0.3).abs() < 1e-12);
        assert_eq!(net.contact(1).unwrap().z, 0.0);
        assert_eq!(net.contact(3).unwrap().z, 0.0);
    }

    #[test]
    fn constant_source_gives_average_everywhere() {
        let mut net = network(3);
        let mut p = StaticPerturbator::new(StaticParams::new(-1.5, Box::new(ConstRng::new(7.0))));
        p.before_run(&mut net, 0.0, 1.0, 0.1).unwrap();
        for c in net.contacts() {
            assert!((c.z + 1.5).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_selection_is_noop() {
        let mut net = network(3);
        let before = net.clone();
        let params = StaticParams::new(1.0, Box::new(ConstRng::new(1.0))).with_tag_expr("missing");
        StaticPerturbator::new(params)
            .before_run(&mut net, 0.0, 1.0, 0.1)
            .unwrap();
        assert_eq!(net, before);
    }

    #[test]
    fn bad_expression_is_hook_error() {
        let mut net = network(2);
        let params = StaticParams::new(0.0, Box::new(ConstRng::new(0.0))).with_tag_expr("(even");
        let err = StaticPerturbator::new(params)
            .before_run(&mut net, 0.0, 1.0, 0.1)
            .unwrap_err();
        assert!(matches!(err, HookError::Network(_)));
    }

    #[test]
    fn null_does_nothing() {
        let mut net = network(2);
        let before = net.clone();
        let mut p = NullPerturbator;
        p.before_run(&mut net, 0.0, 1.0, 0.1).unwrap();
        p.after_run(&mut net).unwrap();
        assert_eq!(net, before);
        assert_eq!(p.name(), "null");
    }
}
