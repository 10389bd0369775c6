//! Redis backend
//!
//! Pushes events onto a list or publishes them to a channel. Two modes:
//!
//! - sync: the worker blocks on the command, optionally pipelining a
//!   batch of commands before harvesting their replies in one pass
//! - async: commands are driven on the engine's tokio runtime so a slow
//!   Redis server never stalls packet workers
//!
//! In both modes a failed command invalidates the connection; reconnects
//! go through the throttle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use ::redis::aio::MultiplexedConnection;
use ::redis::{Client, Cmd, Connection, Value};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use dnseve_config::{RedisMode, RedisOutputConfig};

use crate::common::{SinkError, SinkMetrics, WriteOutcome};
use crate::throttle::ReconnectThrottle;

/// Redis destination, sync or async
pub enum RedisBackend {
    Sync(SyncRedis),
    Async(AsyncRedis),
}

impl RedisBackend {
    /// Set up the backend.
    ///
    /// Async mode needs a runtime handle from the engine; without one it
    /// degrades to sync mode with a warning. A server that is down at
    /// startup is not fatal.
    pub fn open(
        config: &RedisOutputConfig,
        runtime: Option<Handle>,
        metrics: Arc<SinkMetrics>,
    ) -> Result<Self, SinkError> {
        let client = Client::open(config.url())
            .map_err(|e| SinkError::init(format!("redis client: {e}")))?;

        if config.use_async {
            match runtime {
                Some(handle) => {
                    return Ok(Self::Async(AsyncRedis::new(client, config, handle, metrics)))
                }
                None => warn!(
                    server = %config.server,
                    "no async runtime available, falling back to sync redis"
                ),
            }
        }
        Ok(Self::Sync(SyncRedis::new(client, config, metrics)))
    }

    /// Write one event
    pub fn write(&mut self, payload: &[u8]) -> WriteOutcome {
        match self {
            Self::Sync(redis) => redis.write(payload),
            Self::Async(redis) => redis.write(payload),
        }
    }

    /// Flush pipelined state before shutdown
    pub fn close(&mut self) {
        if let Self::Sync(redis) = self {
            redis.harvest_replies();
        }
    }
}

/// Blocking Redis connection with optional command pipelining
pub struct SyncRedis {
    client: Client,
    conn: Option<Connection>,
    mode: RedisMode,
    key: String,
    batch_size: usize,
    pending: usize,
    throttle: ReconnectThrottle,
    metrics: Arc<SinkMetrics>,
}

impl SyncRedis {
    fn new(client: Client, config: &RedisOutputConfig, metrics: Arc<SinkMetrics>) -> Self {
        // batch_size 0 means no pipelining at all
        let batch_size = if config.pipelining.enabled {
            config.pipelining.batch_size.max(1)
        } else {
            0
        };
        let mut redis = Self {
            client,
            conn: None,
            mode: config.mode,
            key: config.key.clone(),
            batch_size,
            pending: 0,
            throttle: ReconnectThrottle::new(config.reconnect_interval),
            metrics,
        };

        match redis.client.get_connection() {
            Ok(conn) => redis.conn = Some(conn),
            Err(e) => warn!(error = %e, "redis unavailable, will retry on write"),
        }
        redis
    }

    fn write(&mut self, payload: &[u8]) -> WriteOutcome {
        if self.conn.is_none() && !self.try_reconnect() {
            return WriteOutcome::Dropped;
        }

        if self.batch_size > 0 {
            self.write_pipelined(payload)
        } else {
            self.write_immediate(payload)
        }
    }

    /// Queue the command and harvest replies once a full batch is out.
    fn write_pipelined(&mut self, payload: &[u8]) -> WriteOutcome {
        let packed = self.command(payload).get_packed_command();
        let Some(conn) = self.conn.as_mut() else {
            return WriteOutcome::Dropped;
        };

        if let Err(e) = conn.send_packed_command(&packed) {
            warn!(error = %e, "redis pipeline send failed");
            self.invalidate();
            return WriteOutcome::Dropped;
        }

        self.pending += 1;
        if self.pending >= self.batch_size {
            self.harvest_replies();
        }
        WriteOutcome::Written
    }

    fn write_immediate(&mut self, payload: &[u8]) -> WriteOutcome {
        let cmd = self.command(payload);
        if self.query(&cmd) {
            return WriteOutcome::Written;
        }

        // One retry on a fresh connection, then give up on this event
        self.invalidate();
        if self.try_reconnect() && self.query(&cmd) {
            WriteOutcome::Written
        } else {
            self.invalidate();
            WriteOutcome::Dropped
        }
    }

    /// Collect replies for every pipelined command still in flight.
    fn harvest_replies(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let Some(conn) = self.conn.as_mut() else {
            return;
        };

        for _ in 0..pending {
            match conn.recv_response() {
                Ok(Value::Int(_)) | Ok(Value::Okay) => {}
                Ok(other) => {
                    warn!(reply = ?other, "unexpected redis reply, reopening");
                    self.invalidate();
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "redis reply harvest failed");
                    self.invalidate();
                    return;
                }
            }
        }
    }

    fn query(&mut self, cmd: &Cmd) -> bool {
        let Some(conn) = self.conn.as_mut() else {
            return false;
        };
        match cmd.query::<Value>(conn) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "redis command failed");
                false
            }
        }
    }

    fn command(&self, payload: &[u8]) -> Cmd {
        let mut cmd = redis::cmd(self.mode.command());
        cmd.arg(&self.key).arg(payload);
        cmd
    }

    fn invalidate(&mut self) {
        self.conn = None;
        self.pending = 0;
    }

    fn try_reconnect(&mut self) -> bool {
        if !self.throttle.should_attempt() {
            return false;
        }
        self.metrics.reconnect();

        match self.client.get_connection() {
            Ok(conn) => {
                debug!("redis reconnected");
                self.conn = Some(conn);
                self.pending = 0;
                self.throttle.reset();
                true
            }
            Err(e) => {
                warn!(error = %e, "redis reconnect failed");
                false
            }
        }
    }
}

/// Redis driven on the engine's event loop.
///
/// The worker only clones the multiplexed connection and spawns the
/// command; it never blocks on the network. Command failures flip the
/// shared `failed` flag and the next write schedules a throttled
/// reconnect.
pub struct AsyncRedis {
    handle: Handle,
    client: Client,
    conn: Arc<Mutex<Option<MultiplexedConnection>>>,
    failed: Arc<AtomicBool>,
    mode: RedisMode,
    key: String,
    throttle: ReconnectThrottle,
    metrics: Arc<SinkMetrics>,
}

impl AsyncRedis {
    fn new(
        client: Client,
        config: &RedisOutputConfig,
        handle: Handle,
        metrics: Arc<SinkMetrics>,
    ) -> Self {
        let redis = Self {
            handle,
            client,
            conn: Arc::new(Mutex::new(None)),
            failed: Arc::new(AtomicBool::new(false)),
            mode: config.mode,
            key: config.key.clone(),
            throttle: ReconnectThrottle::new(config.reconnect_interval),
            metrics,
        };
        redis.spawn_connect();
        redis
    }

    fn write(&mut self, payload: &[u8]) -> WriteOutcome {
        if self.failed.load(Ordering::Acquire) {
            if self.throttle.should_attempt() {
                self.metrics.reconnect();
                self.spawn_connect();
            }
            return WriteOutcome::Dropped;
        }

        let Some(mut conn) = self.conn.lock().clone() else {
            // Initial connect still in flight
            return WriteOutcome::Dropped;
        };

        let mut cmd = redis::cmd(self.mode.command());
        cmd.arg(&self.key).arg(payload);

        let shared_conn = Arc::clone(&self.conn);
        let failed = Arc::clone(&self.failed);
        self.handle.spawn(async move {
            let reply: redis::RedisResult<Value> = cmd.query_async(&mut conn).await;
            if let Err(e) = reply {
                warn!(error = %e, "async redis command failed");
                shared_conn.lock().take();
                failed.store(true, Ordering::Release);
            }
        });
        WriteOutcome::Written
    }

    fn spawn_connect(&self) {
        let client = self.client.clone();
        let shared_conn = Arc::clone(&self.conn);
        let failed = Arc::clone(&self.failed);
        self.handle.spawn(async move {
            match client.get_multiplexed_async_connection().await {
                Ok(conn) => {
                    *shared_conn.lock() = Some(conn);
                    failed.store(false, Ordering::Release);
                    debug!("async redis connected");
                }
                Err(e) => {
                    warn!(error = %e, "async redis connect failed");
                    failed.store(true, Ordering::Release);
                }
            }
        });
    }
}
