//! Registry pattern for dynamic integrator management
//!
//! Each integrator describes itself (name, aliases, convergence order) and the
//! registry builds its lookup table from that metadata. Simulations resolve
//! the integrator named in their configuration through here.

use super::Integrator;
use std::collections::{HashMap, HashSet};

/// Registry for runtime integrator lookup
///
/// Integrators are stateless, so `create` simply hands out a fresh box via
/// `clone_box()`.
pub struct IntegratorRegistry {
    /// Maps names (canonical and aliases) to integrator instances
    integrators: HashMap<String, Box<dyn Integrator>>,
}

impl IntegratorRegistry {
    /// Create an empty registry without any pre-registered integrators.
    pub fn new() -> Self {
        Self {
            integrators: HashMap::new(),
        }
    }

    /// Register the integrators that ship with the crate.
    pub fn with_standard_integrators(mut self) -> Self {
        use super::{ConstantAcceleration, SymplecticEuler};

        self.register_integrator(Box::new(ConstantAcceleration));
        self.register_integrator(Box::new(SymplecticEuler));

        self
    }

    /// Register a single integrator.
    ///
    /// Returns self for method chaining.
    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.register_integrator(integrator);
        self
    }

    pub fn register_integrator(&mut self, integrator: Box<dyn Integrator>) {
        for alias in integrator.aliases() {
            self.integrators
                .insert(alias.to_string(), integrator.clone_box());
        }

        self.integrators
            .insert(integrator.name().to_string(), integrator);
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn Integrator>, String> {
        self.integrators
            .get(name)
            .map(|integrator| integrator.clone_box())
            .ok_or_else(|| {
                let alias_names: Vec<String> =
                    self.list_aliases().into_iter().map(|(a, _)| a).collect();
                format!(
                    "Unknown integrator: '{}'. Available integrators: {}. Aliases: {}",
                    name,
                    self.list_available().join(", "),
                    alias_names.join(", ")
                )
            })
    }

    pub fn list_available(&self) -> Vec<String> {
        let canonical_names: HashSet<String> = self
            .integrators
            .values()
            .map(|integrator| integrator.name().to_string())
            .collect();

        let mut names: Vec<String> = canonical_names.into_iter().collect();
        names.sort();
        names
    }

    pub fn list_aliases(&self) -> Vec<(String, String)> {
        let mut aliases: Vec<(String, String)> = self
            .integrators
            .iter()
            .filter(|(key, integrator)| key.as_str() != integrator.name())
            .map(|(key, integrator)| (key.clone(), integrator.name().to_string()))
            .collect();

        aliases.sort_by(|a, b| a.0.cmp(&b.0));
        aliases
    }
}

impl Default for IntegratorRegistry {
    fn default() -> Self {
        Self::new().with_standard_integrators()
    }
}
