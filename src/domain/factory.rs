use std::collections::BTreeMap;

use super::errors::FactoryError;
use super::table::{Group, Table, TableID};
use super::tables::{securities, trading_dates};

// ============================================================================
// Table Factory - Group → blank table constructor registry
// ============================================================================

type Constructor = fn(TableID) -> Box<dyn Table>;

struct Registration {
    singleton: bool,
    constructor: Constructor,
}

#[derive(Default)]
pub struct Factory {
    registry: BTreeMap<Group, Registration>,
}

impl Factory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory with every table group known to the application
    pub fn main() -> Self {
        let mut factory = Self::new();
        factory
            .register(trading_dates::GROUP, true, trading_dates::new_table)
            .and_then(|f| f.register(securities::GROUP, true, securities::new_table))
            .expect("built-in table groups are registered once");
        factory
    }

    pub fn register(
        &mut self,
        group: Group,
        singleton: bool,
        constructor: Constructor,
    ) -> Result<&mut Self, FactoryError> {
        if self.registry.contains_key(&group) {
            return Err(FactoryError::DuplicateGroup(group));
        }
        self.registry.insert(
            group,
            Registration {
                singleton,
                constructor,
            },
        );
        Ok(self)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.registry.keys()
    }

    fn registration(&self, id: &TableID) -> Result<&Registration, FactoryError> {
        let registration = self
            .registry
            .get(&id.group)
            .ok_or_else(|| FactoryError::UnknownGroup(id.group.clone()))?;

        if registration.singleton && id.name != id.group.as_str() {
            return Err(FactoryError::InvalidSingletonName(id.clone()));
        }

        Ok(registration)
    }

    /// Blank table for `id`, or the wiring defect that prevents building one
    pub fn try_new_table(&self, id: TableID) -> Result<Box<dyn Table>, FactoryError> {
        let constructor = self.registration(&id)?.constructor;
        Ok(constructor(id))
    }

    /// Blank table for `id`
    ///
    /// # Panics
    ///
    /// On an unknown group or a singleton name that differs from its group.
    /// Both mean the process was wired incorrectly and must not continue.
    pub fn new_table(&self, id: TableID) -> Box<dyn Table> {
        self.try_new_table(id).unwrap_or_else(|err| misconfigured(err))
    }

    /// Fail fast on an id no table could ever be built for
    ///
    /// # Panics
    ///
    /// Under the same conditions as [`Factory::new_table`].
    pub fn assert_known(&self, id: &TableID) {
        if let Err(err) = self.registration(id) {
            misconfigured(err);
        }
    }
}

fn misconfigured(err: FactoryError) -> ! {
    tracing::error!(error = %err, "Table factory misconfigured");
    panic!("{err}");
}

// ============================================================================
// Unit Tests
// ============================================================================
