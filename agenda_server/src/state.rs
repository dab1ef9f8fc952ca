use agenda_core::appointments::{Scheduler, SledStore};

pub struct ServerState {
    scheduler: Scheduler<SledStore>,
}

impl From<Scheduler<SledStore>> for ServerState {
    fn from(scheduler: Scheduler<SledStore>) -> Self {
        Self { scheduler }
    }
}

impl ServerState {
    pub fn scheduler(&self) -> &Scheduler<SledStore> {
        &self.scheduler
    }
}
