use crate::{
    BoxError, CounterStore, Error, MySqlConnector, NormalizedConfig, Result, StoreConfig,
    StoreConnector,
};
use hexid::MachineId;
use parking_lot::Mutex;

/// Machine ids occupy the low three bytes of a leased key.
const MACHINE_ID_MASK: u64 = 0xFF_FFFF;

struct State<S> {
    machine_id: Option<MachineId>,
    active: Option<(NormalizedConfig, S)>,
}

/// Resolves the machine id a process stamps into its ids.
///
/// Two entry points exist: [`assign_explicit`](Self::assign_explicit)
/// validates a caller-chosen id with no I/O, and
/// [`resolve_from_store`](Self::resolve_from_store) leases a fresh id from
/// the shared counter store. Resolution happens once per process in normal
/// use; the resolved id is cached, and resolving again with an equal
/// configuration returns the cache without touching the store.
///
/// All state lives behind one lock, so concurrent resolutions serialize and
/// the idempotence check stays correct under race. Id generation never goes
/// through this type.
///
/// # Example
///
/// ```no_run
/// use hexid::{IdGenerator, WallClock};
/// use hexid_mysql::{MachineIdAllocator, StoreConfig};
///
/// let allocator = MachineIdAllocator::mysql();
/// let config = StoreConfig::new("mysql", "db.internal:3306/ids", "svc", "secret");
/// let machine_id = allocator.resolve_from_store(&config)?;
///
/// let generator = IdGenerator::new(machine_id, WallClock);
/// println!("{}", generator.next_id());
/// # Ok::<(), hexid_mysql::Error>(())
/// ```
pub struct MachineIdAllocator<C = MySqlConnector>
where
    C: StoreConnector,
{
    connector: C,
    state: Mutex<State<C::Store>>,
}

impl MachineIdAllocator<MySqlConnector> {
    /// An allocator leasing from MySQL, the default store kind.
    pub fn mysql() -> Self {
        Self::with_connector(MySqlConnector)
    }
}

impl Default for MachineIdAllocator<MySqlConnector> {
    fn default() -> Self {
        Self::mysql()
    }
}

impl<C> MachineIdAllocator<C>
where
    C: StoreConnector,
{
    /// Creates an allocator around a custom connector.
    pub fn with_connector(connector: C) -> Self {
        Self {
            connector,
            state: Mutex::new(State {
                machine_id: None,
                active: None,
            }),
        }
    }

    /// Validates and caches an explicitly assigned machine id. No I/O.
    ///
    /// Any previously active store configuration is discarded, so a later
    /// [`resolve_from_store`](Self::resolve_from_store) call leases a fresh
    /// id instead of returning this one.
    pub fn assign_explicit(&self, machine_id: u32) -> Result<MachineId> {
        let machine_id = MachineId::new(machine_id)?;

        let mut state = self.state.lock();
        state.machine_id = Some(machine_id);
        state.active = None;

        tracing::info!(machine_id = machine_id.get(), "machine id assigned");
        Ok(machine_id)
    }

    /// Returns the currently resolved machine id, if any.
    pub fn machine_id(&self) -> Option<MachineId> {
        self.state.lock().machine_id
    }

    /// Leases a machine id from the configured counter store.
    ///
    /// Configuration is validated before any I/O. If the normalized
    /// configuration equals the active one, the cached id is returned and
    /// the store is not touched. Otherwise a fresh store client is
    /// connected and the lease is attempted up to `retry_count + 1` times
    /// with no backoff; each failed attempt is logged, and exhaustion
    /// yields [`Error::AllocationFailed`] with the last cause. The caller
    /// decides whether that is fatal.
    pub fn resolve_from_store(&self, config: &StoreConfig) -> Result<MachineId> {
        let normalized = config.normalize()?;

        let mut state = self.state.lock();
        if let Some((active, _)) = &state.active {
            if *active == normalized {
                if let Some(machine_id) = state.machine_id {
                    return Ok(machine_id);
                }
            }
        }

        let store = self.connector.connect(&normalized)?;
        let machine_id = Self::lease(&store, &normalized)?;

        tracing::info!(
            machine_id = machine_id.get(),
            uri = %normalized.uri,
            table = %normalized.table_name,
            "machine id leased from store"
        );

        state.machine_id = Some(machine_id);
        state.active = Some((normalized, store));
        Ok(machine_id)
    }

    fn lease(store: &C::Store, config: &NormalizedConfig) -> Result<MachineId> {
        let attempts = config.retry_count.saturating_add(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match Self::try_lease(store, &config.table_name) {
                Ok(key) => {
                    let machine_id = MachineId::new((key & MACHINE_ID_MASK) as u32)?;
                    return Ok(machine_id);
                }
                Err(source) => {
                    tracing::warn!(
                        attempt,
                        attempts,
                        error = %source,
                        "machine id allocation attempt failed"
                    );
                    if attempt >= attempts {
                        return Err(Error::AllocationFailed {
                            attempts: attempt,
                            source,
                        });
                    }
                }
            }
        }
    }

    fn try_lease(store: &C::Store, table: &str) -> Result<u64, BoxError> {
        store.ensure_counter_table(table)?;
        store.allocate_next(table)
    }
}
