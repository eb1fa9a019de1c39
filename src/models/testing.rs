use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Local, Utc};
use mockable::Clock;

/// Clock that hands out a fixed sequence of instants, one per call.
pub struct ScriptedClock {
    times: Mutex<VecDeque<DateTime<Local>>>,
}

impl ScriptedClock {
    pub fn new(times: impl IntoIterator<Item = DateTime<Local>>) -> Self {
        Self {
            times: Mutex::new(times.into_iter().collect()),
        }
    }
}

impl Clock for ScriptedClock {
    fn local(&self) -> DateTime<Local> {
        self.times
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted clock ran out of instants")
    }

    fn utc(&self) -> DateTime<Utc> {
        self.local().with_timezone(&Utc)
    }
}
