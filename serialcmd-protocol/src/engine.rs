//! Protocol engine
//!
//! Owns the serializer, the command table and the device context, and runs
//! the one-shot version announcement and the serve cycle. The engine keeps
//! no transaction state between serve steps: each step reads one command
//! id, runs at most one handler, and returns to idle.
//!
//! ```text
//!            id decoded
//!   ┌──────┐ ─────────────▶ ┌──────────────┐
//!   │ Idle │                │ Handling(id) │
//!   └──────┘ ◀───────────── └──────────────┘
//!            step returns (always)
//! ```

use serialcmd_hal::ByteChannel;

use crate::serializer::Serializer;
use crate::status::Status;
use crate::table::CommandTable;

/// Serve-step state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineState {
    /// Waiting for the next command id
    #[default]
    Idle,
    /// A command id has been consumed and its handler is running
    Handling(u8),
}

/// What one serve step put on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Served {
    /// Command id read from the channel
    pub id: u8,
    /// Status byte written in response
    pub status: Status,
}

/// Diagnostic counters, saturating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    /// Requests answered with a success status
    pub succeeded: u32,
    /// Requests answered with a failure status by their handler
    pub failed: u32,
    /// Requests rejected because the command id was unknown
    pub unknown: u32,
}

impl Stats {
    /// Total requests answered
    pub fn total(&self) -> u32 {
        self.succeeded
            .saturating_add(self.failed)
            .saturating_add(self.unknown)
    }
}

/// The peripheral side of the protocol
pub struct Protocol<'t, C: ByteChannel, D> {
    io: Serializer<C>,
    table: CommandTable<'t, C, D>,
    device: D,
    state: EngineState,
    begun: bool,
    stats: Stats,
}

impl<'t, C: ByteChannel, D> Protocol<'t, C, D> {
    /// Create an engine bound to one channel, table and device
    pub fn new(channel: C, table: CommandTable<'t, C, D>, device: D) -> Self {
        Self {
            io: Serializer::new(channel),
            table,
            device,
            state: EngineState::Idle,
            begun: false,
            stats: Stats::default(),
        }
    }

    /// Announce the protocol version
    ///
    /// Writes `version` once. There is no acknowledgment; later calls write
    /// nothing, even if flushing the first announcement failed.
    pub fn begin(&mut self, version: u8) -> Result<(), C::Error> {
        if self.begun {
            return Ok(());
        }
        self.io.write(&version)?;
        self.begun = true;
        self.io.flush()?;
        debug!("announced protocol version {=u8:#x}", version);
        Ok(())
    }

    /// Serve one request, blocking until a command id arrives
    ///
    /// Channel failures are returned as errors; every protocol-level
    /// failure is answered on the wire and reported through [`Served`].
    pub fn pull(&mut self) -> Result<Served, C::Error> {
        let id: u8 = self.io.read()?;
        self.state = EngineState::Handling(id);
        let result = self.serve(id);
        self.state = EngineState::Idle;
        result
    }

    /// Serve one request if a command id is already waiting
    ///
    /// Returns `Ok(None)` without touching the channel when nothing is
    /// available. Argument bytes are still read with blocking semantics.
    pub fn poll(&mut self) -> Result<Option<Served>, C::Error> {
        if self.io.available()? == 0 {
            return Ok(None);
        }
        self.pull().map(Some)
    }

    fn serve(&mut self, id: u8) -> Result<Served, C::Error> {
        let status = match self.table.dispatch(id) {
            Ok(handler) => {
                trace!("dispatching {=u8:#x} ({=str})", id, handler.name());
                let status = handler.handle(&mut self.io, &mut self.device)?;
                match status {
                    Status::Ok => {
                        self.stats.succeeded = self.stats.succeeded.saturating_add(1);
                    }
                    Status::Error(code) => {
                        debug!("{=str} failed: {}", handler.name(), code);
                        self.stats.failed = self.stats.failed.saturating_add(1);
                    }
                }
                status
            }
            Err(unknown) => {
                // Any argument bytes the host queued stay in the stream
                warn!("{}", unknown);
                self.io.write_status(Status::FAILURE)?;
                self.stats.unknown = self.stats.unknown.saturating_add(1);
                Status::FAILURE
            }
        };
        self.io.flush()?;
        Ok(Served { id, status })
    }

    /// Whether the version has been announced
    pub fn has_begun(&self) -> bool {
        self.begun
    }

    /// Current serve-step state
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Diagnostic counters
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// The command table
    pub fn table(&self) -> CommandTable<'t, C, D> {
        self.table
    }

    /// Access the device context
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutably access the device context
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Access the channel
    pub fn channel(&self) -> &C {
        self.io.channel()
    }

    /// Mutably access the channel
    pub fn channel_mut(&mut self) -> &mut C {
        self.io.channel_mut()
    }

    /// Tear the engine down into its channel and device
    pub fn into_parts(self) -> (C, D) {
        (self.io.into_inner(), self.device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Command, Handler};
    use crate::status::ErrorCode;
    use proptest::prelude::*;
    use serialcmd_hal::{MockChannel, MockError};

    type Chan = MockChannel<64>;

    #[derive(Debug, Default)]
    struct Probe {
        reading: u8,
        stored: Option<(u8, u16)>,
        uptime: u32,
        actions: u32,
    }

    /// id 0: store a pair, rejecting keys above 100
    struct Store;

    impl Command<Probe> for Store {
        const NAME: &'static str = "store";
        type Args = (u8, u16);
        type Response = ();

        fn execute(&self, device: &mut Probe, (key, value): (u8, u16)) -> Result<(), ErrorCode> {
            if key > 100 {
                return Err(ErrorCode::FAILURE);
            }
            device.stored = Some((key, value));
            device.actions += 1;
            Ok(())
        }
    }

    /// id 1: report uptime
    struct Uptime;

    impl Command<Probe> for Uptime {
        const NAME: &'static str = "uptime";
        type Args = ();
        type Response = u32;

        fn execute(&self, device: &mut Probe, _args: ()) -> Result<u32, ErrorCode> {
            device.actions += 1;
            Ok(device.uptime)
        }
    }

    /// id 2: read the probe's current value
    struct Sample;

    impl Command<Probe> for Sample {
        const NAME: &'static str = "sample";
        type Args = u8;
        type Response = u8;

        fn execute(&self, device: &mut Probe, _channel: u8) -> Result<u8, ErrorCode> {
            device.actions += 1;
            Ok(device.reading)
        }
    }

    /// id 3: always fails with a deployment-specific code
    struct Busy;

    impl Command<Probe> for Busy {
        const NAME: &'static str = "busy";
        type Args = ();
        type Response = u8;

        fn execute(&self, _device: &mut Probe, _args: ()) -> Result<u8, ErrorCode> {
            Err(ErrorCode::new(0x42).unwrap())
        }
    }

    const ENTRIES: [&dyn Handler<Chan, Probe>; 4] = [&Store, &Uptime, &Sample, &Busy];

    fn engine(input: &[u8]) -> Protocol<'static, Chan, Probe> {
        let mut channel = Chan::new();
        channel.feed(input).unwrap();
        let table = CommandTable::new(&ENTRIES).unwrap();
        Protocol::new(
            channel,
            table,
            Probe {
                reading: 0x37,
                uptime: 0xA1A2A3A4,
                ..Probe::default()
            },
        )
    }

    #[test]
    fn test_begin_announces_version_once() {
        let mut protocol = engine(&[]);
        assert!(!protocol.has_begun());

        protocol.begin(0x01).unwrap();
        protocol.begin(0x01).unwrap();

        assert!(protocol.has_begun());
        assert_eq!(protocol.channel().written(), &[0x01]);
    }

    /// Mock channel whose first flush fails
    struct FlakyFlush {
        inner: Chan,
        failures: u32,
    }

    impl ByteChannel for FlakyFlush {
        type Error = MockError;

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, MockError> {
            self.inner.read_blocking(buf)
        }

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), MockError> {
            self.inner.write_blocking(data)
        }

        fn available(&mut self) -> Result<usize, MockError> {
            self.inner.available()
        }

        fn flush(&mut self) -> Result<(), MockError> {
            if self.failures == 0 {
                self.failures += 1;
                return Err(MockError::Overflow);
            }
            self.inner.flush()
        }
    }

    struct Nop;

    impl Command<()> for Nop {
        const NAME: &'static str = "nop";
        type Args = ();
        type Response = ();

        fn execute(&self, _device: &mut (), _args: ()) -> Result<(), ErrorCode> {
            Ok(())
        }
    }

    #[test]
    fn test_begin_after_failed_flush_writes_nothing() {
        let entries: [&dyn Handler<FlakyFlush, ()>; 1] = [&Nop];
        let table = CommandTable::new(&entries).unwrap();
        let channel = FlakyFlush {
            inner: Chan::new(),
            failures: 0,
        };
        let mut protocol = Protocol::new(channel, table, ());

        assert_eq!(protocol.begin(0x01), Err(MockError::Overflow));
        assert!(protocol.has_begun());
        assert_eq!(protocol.begin(0x01), Ok(()));

        assert_eq!(protocol.channel().inner.written(), &[0x01]);
    }

    #[test]
    fn test_idle_poll_emits_nothing() {
        let mut protocol = engine(&[]);
        protocol.begin(0x01).unwrap();

        for _ in 0..10 {
            assert_eq!(protocol.poll(), Ok(None));
        }

        assert_eq!(protocol.channel().written(), &[0x01]);
        assert_eq!(protocol.state(), EngineState::Idle);
        assert_eq!(protocol.stats().total(), 0);
    }

    #[test]
    fn test_pull_without_data_stalls_silently() {
        let mut protocol = engine(&[]);
        assert_eq!(protocol.pull(), Err(MockError::WouldBlock));
        assert!(protocol.channel().written().is_empty());
        assert_eq!(protocol.state(), EngineState::Idle);
    }

    #[test]
    fn test_read_command_scenario() {
        let mut protocol = engine(&[0x02, 0x05]);

        let served = protocol.pull().unwrap();

        assert_eq!(served, Served { id: 2, status: Status::Ok });
        assert_eq!(protocol.channel().written(), &[0x00, 0x37]);
        assert_eq!(protocol.channel().pending(), 0);
    }

    #[test]
    fn test_unknown_command_scenario() {
        let mut protocol = engine(&[0xFF]);

        let served = protocol.pull().unwrap();

        assert_eq!(served, Served { id: 0xFF, status: Status::FAILURE });
        assert_eq!(protocol.channel().written(), &[0x01]);
        assert_eq!(protocol.device().actions, 0);
        assert_eq!(protocol.stats().unknown, 1);
    }

    #[test]
    fn test_unknown_command_consumes_only_the_id() {
        let mut protocol = engine(&[0x04, 0x05, 0x06]);

        protocol.pull().unwrap();

        assert_eq!(protocol.channel().consumed(), 1);
        assert_eq!(protocol.channel().pending(), 2);
    }

    #[test]
    fn test_rejected_arguments_keep_stream_aligned() {
        // store(200, 0x1234) is rejected, the following sample must still parse
        let mut protocol = engine(&[0x00, 200, 0x34, 0x12, 0x02, 0x05]);

        let first = protocol.pull().unwrap();
        let second = protocol.pull().unwrap();

        assert_eq!(first.status, Status::FAILURE);
        assert_eq!(second, Served { id: 2, status: Status::Ok });
        assert_eq!(protocol.channel().written(), &[0x01, 0x00, 0x37]);
        assert_eq!(protocol.device().stored, None);
    }

    #[test]
    fn test_success_payload_follows_status() {
        let mut protocol = engine(&[0x00, 7, 0x34, 0x12, 0x01]);

        protocol.pull().unwrap();
        protocol.pull().unwrap();

        assert_eq!(protocol.device().stored, Some((7, 0x1234)));
        assert_eq!(
            protocol.channel().written(),
            &[0x00, 0x00, 0xA4, 0xA3, 0xA2, 0xA1]
        );
    }

    #[test]
    fn test_custom_error_code_without_payload() {
        let mut protocol = engine(&[0x03]);

        let served = protocol.pull().unwrap();

        assert_eq!(served.status.to_byte(), 0x42);
        assert_eq!(protocol.channel().written(), &[0x42]);
        assert_eq!(protocol.stats().failed, 1);
    }

    #[test]
    fn test_truncated_arguments_return_to_idle() {
        let mut protocol = engine(&[0x00, 0x07]);

        assert_eq!(protocol.pull(), Err(MockError::WouldBlock));
        assert_eq!(protocol.state(), EngineState::Idle);
        assert!(protocol.channel().written().is_empty());
        assert_eq!(protocol.device().actions, 0);
    }

    #[test]
    fn test_poll_serves_waiting_request() {
        let mut protocol = engine(&[0x01]);

        assert_eq!(
            protocol.poll(),
            Ok(Some(Served { id: 1, status: Status::Ok }))
        );
        assert_eq!(protocol.poll(), Ok(None));
        assert_eq!(protocol.stats().succeeded, 1);
    }

    #[test]
    fn test_each_response_is_flushed() {
        let mut protocol = engine(&[0x01, 0xFF]);
        protocol.pull().unwrap();
        protocol.pull().unwrap();
        assert_eq!(protocol.channel().flushes(), 2);
    }

    #[test]
    fn test_into_parts() {
        let mut protocol = engine(&[0x02, 0x00]);
        protocol.device_mut().reading = 0x99;
        protocol.pull().unwrap();

        let (channel, device) = protocol.into_parts();
        assert_eq!(channel.written(), &[0x00, 0x99]);
        assert_eq!(device.actions, 1);
    }

    proptest! {
        #[test]
        fn prop_status_precedes_payload(requests in proptest::collection::vec((0u8..6, any::<u8>(), any::<u16>()), 1..8)) {
            for (id, key, value) in requests {
                let mut input: heapless::Vec<u8, 8> = heapless::Vec::new();
                input.push(id).unwrap();
                if id == 0 {
                    input.push(key).unwrap();
                    input.extend_from_slice(&value.to_le_bytes()).unwrap();
                } else if id == 2 {
                    input.push(key).unwrap();
                }

                let mut protocol = engine(&input);
                let served = protocol.pull().unwrap();
                let written = protocol.channel().written();

                prop_assert_eq!(written[0], served.status.to_byte());
                let expected_payload = match (served.status, id) {
                    (Status::Ok, 1) => 4,
                    (Status::Ok, 2) => 1,
                    _ => 0,
                };
                prop_assert_eq!(written.len(), 1 + expected_payload);
                prop_assert_eq!(protocol.channel().pending(), 0);
                prop_assert_eq!(protocol.state(), EngineState::Idle);
            }
        }
    }
}
