//! Nullable ledger client: attaches records in memory and records broadcasts.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use subgen_client::{
    prepare_zero_value, records_to_wire, ClientError, LedgerClient, PrepareOptions, Transfer,
    WireRecord,
};
use subgen_types::{Frontier, PreparedRecord, Record, RecordHash, Timestamp};

/// How the null network answers broadcasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BroadcastPolicy {
    AcceptAll,
    RejectAll,
    /// Reject the first `n` attempts of every record, then accept.
    RejectFirst(usize),
}

type AttachHook = Box<dyn FnOnce() + Send>;

/// A deterministic ledger client for testing.
///
/// Record hashes derive from an internal counter, so two runs with the same
/// script produce the same subtangle.
pub struct NullLedgerClient {
    frontiers: Mutex<VecDeque<Frontier>>,
    fallback_frontier: Frontier,
    tip_requests: AtomicUsize,
    attached: Mutex<Vec<Record>>,
    attach_limit: Option<usize>,
    attach_hook: Mutex<Option<(usize, AttachHook)>>,
    broadcast_policy: BroadcastPolicy,
    broadcast_attempts: Mutex<Vec<WireRecord>>,
    broadcast_failures: Mutex<HashMap<WireRecord, usize>>,
    accepted: Mutex<Vec<WireRecord>>,
    clock: AtomicU64,
}

impl NullLedgerClient {
    pub fn new() -> Self {
        Self {
            frontiers: Mutex::new(VecDeque::new()),
            fallback_frontier: Frontier::new(RecordHash::new([0xA0; 32]), RecordHash::new([0xB0; 32])),
            tip_requests: AtomicUsize::new(0),
            attached: Mutex::new(Vec::new()),
            attach_limit: None,
            attach_hook: Mutex::new(None),
            broadcast_policy: BroadcastPolicy::AcceptAll,
            broadcast_attempts: Mutex::new(Vec::new()),
            broadcast_failures: Mutex::new(HashMap::new()),
            accepted: Mutex::new(Vec::new()),
            clock: AtomicU64::new(1),
        }
    }

    /// Frontiers handed out by tip selection, in order. Once exhausted, the
    /// last configured frontier keeps being returned.
    pub fn with_frontiers(mut self, frontiers: Vec<Frontier>) -> Self {
        if let Some(last) = frontiers.last() {
            self.fallback_frontier = *last;
        }
        self.frontiers = Mutex::new(frontiers.into());
        self
    }

    /// Fail every attach request after `n` successful ones.
    pub fn failing_attach_after(mut self, n: usize) -> Self {
        self.attach_limit = Some(n);
        self
    }

    pub fn with_broadcast_policy(mut self, policy: BroadcastPolicy) -> Self {
        self.broadcast_policy = policy;
        self
    }

    /// Run `hook` right after the `n`th record has been attached.
    pub fn on_attach(self, n: usize, hook: impl FnOnce() + Send + 'static) -> Self {
        *self.attach_hook.lock().unwrap() = Some((n, Box::new(hook)));
        self
    }

    /// Every record attached so far, in attachment order.
    pub fn attached(&self) -> Vec<Record> {
        self.attached.lock().unwrap().clone()
    }

    /// Every broadcast attempt, including rejected ones.
    pub fn broadcast_attempts(&self) -> Vec<WireRecord> {
        self.broadcast_attempts.lock().unwrap().clone()
    }

    /// Records the network accepted, in submission order.
    pub fn accepted(&self) -> Vec<Record> {
        self.accepted
            .lock()
            .unwrap()
            .iter()
            .map(|w| w.decode_record().expect("null client only accepts its own wire form"))
            .collect()
    }

    pub fn tip_requests(&self) -> usize {
        self.tip_requests.load(Ordering::SeqCst)
    }
}

impl Default for NullLedgerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerClient for NullLedgerClient {
    async fn get_transactions_to_approve(&self, _depth: u32) -> Result<Frontier, ClientError> {
        self.tip_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .frontiers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback_frontier))
    }

    async fn prepare_transfers(
        &self,
        _seed: &str,
        transfers: &[Transfer],
        options: &PrepareOptions,
    ) -> Result<Vec<PreparedRecord>, ClientError> {
        let options = PrepareOptions {
            timestamp: options.timestamp.or(Some(Timestamp::EPOCH)),
        };
        prepare_zero_value(transfers, &options)
    }

    async fn attach_to_tangle(
        &self,
        trunk: RecordHash,
        branch: RecordHash,
        _min_weight_magnitude: u8,
        prepared: Vec<PreparedRecord>,
    ) -> Result<Vec<Record>, ClientError> {
        let (attached_count, records) = {
            let mut attached = self.attached.lock().unwrap();
            if self.attach_limit.is_some_and(|limit| attached.len() >= limit) {
                return Err(ClientError::Rejected {
                    command: "attachToTangle",
                    message: "null client attach limit reached".into(),
                });
            }

            let records: Vec<Record> = prepared
                .into_iter()
                .map(|payload| {
                    let tick = self.clock.fetch_add(1, Ordering::SeqCst);
                    Record::attach(payload, trunk, branch, Timestamp::new(tick), tick)
                })
                .collect();
            // Only the first record of a call is what callers keep.
            attached.extend(records.first().cloned());
            (attached.len(), records)
        };

        let hook = {
            let mut slot = self.attach_hook.lock().unwrap();
            match slot.as_ref() {
                Some((n, _)) if *n == attached_count => slot.take().map(|(_, hook)| hook),
                _ => None,
            }
        };
        if let Some(hook) = hook {
            hook();
        }

        Ok(records)
    }

    fn to_wire(&self, records: &[Record]) -> Result<Vec<WireRecord>, ClientError> {
        records_to_wire(records)
    }

    async fn broadcast_transactions(&self, record: &WireRecord) -> Result<(), ClientError> {
        self.broadcast_attempts.lock().unwrap().push(record.clone());

        let reject = match self.broadcast_policy {
            BroadcastPolicy::AcceptAll => false,
            BroadcastPolicy::RejectAll => true,
            BroadcastPolicy::RejectFirst(n) => {
                let mut failures = self.broadcast_failures.lock().unwrap();
                let seen = failures.entry(record.clone()).or_insert(0);
                if *seen < n {
                    *seen += 1;
                    true
                } else {
                    false
                }
            }
        };

        if reject {
            return Err(ClientError::Rejected {
                command: "broadcastTransactions",
                message: "null network rejected the record".into(),
            });
        }
        self.accepted.lock().unwrap().push(record.clone());
        Ok(())
    }
}
