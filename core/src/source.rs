use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::error::AcquisitionError;
use crate::geo::MS_TO_KMH;
use crate::models::Fix;

/// Én hendelse fra fix-kilden: en posisjon eller en innhentingsfeil.
pub type FixEvent = Result<Fix, AcquisitionError>;

/// Ekstern fix-kilde (ekte enhet, simulator, opptak).
pub trait FixSource {
    fn next_event(&mut self) -> Option<FixEvent>;

    /// Push-adapter: leverer alle hendelser til `sink` i rekkefølge.
    fn drive<F>(&mut self, mut sink: F) -> usize
    where
        Self: Sized,
        F: FnMut(FixEvent),
    {
        let mut n = 0;
        while let Some(event) = self.next_event() {
            sink(event);
            n += 1;
        }
        n
    }
}

/// Spiller av et innspilt forløp.
#[derive(Debug)]
pub struct ReplaySource {
    events: std::vec::IntoIter<FixEvent>,
}

impl ReplaySource {
    pub fn new(events: Vec<FixEvent>) -> Self {
        Self { events: events.into_iter() }
    }
}

impl From<Vec<Fix>> for ReplaySource {
    fn from(fixes: Vec<Fix>) -> Self {
        Self::new(fixes.into_iter().map(Ok).collect())
    }
}

impl FixSource for ReplaySource {
    fn next_event(&mut self) -> Option<FixEvent> {
        self.events.next()
    }
}

const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Emulator: akselererer +2 km/h per tick opp til 60, bremser −1 km/h ned til 5,
/// og kjører østover med simulert fart. Helt deterministisk.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    latitude: f64,
    longitude: f64,
    speed_kmh: f64,
    accelerating: bool,
    timestamp_ms: u64,
    interval_ms: u64,
    tick: u64,
    limit: Option<u64>,
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new(33.729_266_666_666_67, 73.093_135, 0)
    }
}

impl SimulatedSource {
    pub fn new(latitude: f64, longitude: f64, start_ms: u64) -> Self {
        Self {
            latitude,
            longitude,
            speed_kmh: 0.0,
            accelerating: true,
            timestamp_ms: start_ms,
            interval_ms: 1000,
            tick: 0,
            limit: None,
        }
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms.max(1);
        self
    }

    /// Stopper etter `n` fixer (ellers uendelig).
    pub fn with_limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    fn step_speed(&mut self) {
        if self.accelerating {
            self.speed_kmh += 2.0;
            if self.speed_kmh >= 60.0 {
                self.accelerating = false;
            }
        } else {
            self.speed_kmh -= 1.0;
            if self.speed_kmh <= 5.0 {
                self.accelerating = true;
            }
        }
    }
}

impl FixSource for SimulatedSource {
    fn next_event(&mut self) -> Option<FixEvent> {
        if matches!(self.limit, Some(n) if self.tick >= n) {
            return None;
        }
        self.tick += 1;
        self.step_speed();

        let dt_s = self.interval_ms as f64 / 1000.0;
        let speed_ms = self.speed_kmh / MS_TO_KMH;
        let step_m = speed_ms * dt_s;
        let m_per_deg_lon = METERS_PER_DEG_LAT * self.latitude.to_radians().cos();
        self.longitude += step_m / m_per_deg_lon;
        self.timestamp_ms += self.interval_ms;

        let accuracy = 3.0 + (self.tick % 3) as f64 * 0.75;
        let altitude = 100.0 + (self.tick as f64 * 0.1).sin() * 25.0;

        Some(Ok(Fix::new(self.latitude, self.longitude, self.timestamp_ms)
            .with_speed(speed_ms)
            .with_accuracy(accuracy)
            .with_altitude(altitude)))
    }
}

/// Produsent-siden av fix-køen. Kan klones og sendes til andre tråder.
#[derive(Debug, Clone)]
pub struct FixSender(Sender<FixEvent>);

/// Eneste konsument. Hendelser behandles i ankomstrekkefølge, ingen droppes.
#[derive(Debug)]
pub struct FixReceiver(Receiver<FixEvent>);

pub fn fix_channel() -> (FixSender, FixReceiver) {
    let (tx, rx) = mpsc::channel();
    (FixSender(tx), FixReceiver(rx))
}

impl FixSender {
    /// `false` hvis konsumenten er borte.
    pub fn push(&self, event: FixEvent) -> bool {
        self.0.send(event).is_ok()
    }
}

impl FixReceiver {
    pub fn try_next(&self) -> Option<FixEvent> {
        match self.0.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
