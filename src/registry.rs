//! Partial derivatives providers registry
use log::{debug, trace};

use crate::prelude::{
    Config, Dataset, Error, Partials, Provider, ReceiverClock, SatelliteClock, SatellitePosition,
    SitePosition,
};

/// [Registry] of [Provider]s, indexed by unique name.
///
/// The [Registry] is populated once, at startup (see [Registry::with_defaults]),
/// before any computation happens. It is then only read, possibly from multiple threads.
/// Entries are kept in registration order, which makes the design matrix layout reproducible.
#[derive(Default)]
pub struct Registry {
    entries: Vec<(String, Box<dyn Provider>)>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.list_names()).finish()
    }
}

impl Registry {
    /// Site position provider name
    pub const GNSS_SITE_POS: &'static str = "gnss_site_pos";

    /// Satellite position provider name
    pub const GNSS_SAT_POS: &'static str = "gnss_sat_pos";

    /// Receiver clock provider name
    pub const GNSS_RCV_CLOCK: &'static str = "gnss_rcv_clock";

    /// Satellite clock provider name
    pub const GNSS_SAT_CLOCK: &'static str = "gnss_sat_clock";

    /// Creates an empty [Registry].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a [Registry] populated with all built-in [Provider]s,
    /// configured by [Config].
    pub fn with_defaults(cfg: &Config) -> Result<Self, Error> {
        let mut registry = Self::new();
        registry.register(Self::GNSS_SITE_POS, SitePosition::new(cfg))?;
        registry.register(Self::GNSS_SAT_POS, SatellitePosition::new(cfg))?;
        registry.register(Self::GNSS_RCV_CLOCK, ReceiverClock::new(cfg))?;
        registry.register(Self::GNSS_SAT_CLOCK, SatelliteClock::new(cfg))?;
        Ok(registry)
    }

    /// Registers a new [Provider]. Names must be unique:
    /// we never replace an existing entry.
    pub fn register<P: Provider + 'static>(
        &mut self,
        name: &str,
        provider: P,
    ) -> Result<(), Error> {
        if self.contains(name) {
            return Err(Error::DuplicateProvider(name.to_string()));
        }

        debug!(
            "registered provider \"{}\" (depends on {:?})",
            name,
            provider.dependencies()
        );

        self.entries.push((name.to_string(), Box::new(provider)));
        Ok(())
    }

    /// Returns true if a [Provider] is registered under this name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Returns [Provider] registered under this name.
    pub fn lookup(&self, name: &str) -> Result<&dyn Provider, Error> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, provider)| provider.as_ref())
            .ok_or_else(|| Error::UnknownProvider(name.to_string()))
    }

    /// Returns registered names, in registration order.
    pub fn list_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    /// Number of registered [Provider]s
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no [Provider] has been registered yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invokes the [Provider] registered under this name.
    /// Any failure is tagged with the provider name. The returned [Partials]
    /// are verified to have exactly one row per observation.
    pub fn compute(&self, name: &str, dataset: &dyn Dataset) -> Result<Partials, Error> {
        let provider = self.lookup(name)?;

        let tag = |e: Error| Error::Provider {
            provider: name.to_string(),
            source: Box::new(e),
        };

        let partials = provider.compute(dataset).map_err(tag)?;

        let expected = dataset.num_obs();

        if partials.nrows() != expected {
            return Err(tag(Error::RowCount {
                expected,
                found: partials.nrows(),
            }));
        }

        trace!(
            "\"{}\": {}x{} partials [{}]",
            name,
            partials.nrows(),
            partials.ncols(),
            partials.unit()
        );

        Ok(partials)
    }
}
