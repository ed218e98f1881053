pub mod analysis;
pub mod chat;
pub mod config;
pub mod profile;
pub mod symptoms;
pub mod transfer;

use blossom_core::{Config, Database, Session};
use chrono::{Local, NaiveDate};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// The `--date` override, or the local calendar date.
pub fn today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

/// Configuration, database and the stored session for one invocation.
pub struct Store {
    pub config: Config,
    pub db: Database,
    pub session: Session,
    saved_entries: usize,
    saved_messages: usize,
}

impl Store {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let db = Database::open()?;
        let session = db.load_session()?;
        Ok(Self {
            saved_entries: session.log.len(),
            saved_messages: session.messages.len(),
            config,
            db,
            session,
        })
    }

    /// Writes everything appended since the last save.
    pub fn save(&mut self) -> CmdResult {
        self.db
            .save_new(&self.session, self.saved_entries, self.saved_messages)?;
        self.saved_entries = self.session.log.len();
        self.saved_messages = self.session.messages.len();
        Ok(())
    }
}
