//! SQLite-backed persistence for a single user's session.
//!
//! Provides persistent storage for:
//! - The onboarding profile (one row)
//! - The append-only symptom log
//! - The conversation transcript

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::chat::{ConversationMessage, Role};
use crate::cycle::Phase;
use crate::error::{DatabaseError, Result};
use crate::profile::UserProfile;
use crate::session::Session;
use crate::symptoms::{Intensity, Symptom, SymptomEntry};

use super::{data_dir, migrations};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite database holding the profile, symptom log and messages.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/blossom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unusable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("blossom.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)?;
        Ok(Self { conn })
    }

    /// Insert or replace the single profile row.
    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO profile (id, name, age, cycle_length, last_period_date, onboarding_complete)
             VALUES (1, ?1, ?2, ?3, ?4, ?5)",
            params![
                profile.name,
                profile.age,
                profile.cycle_length,
                profile.last_period_date.map(|d| d.format(DATE_FORMAT).to_string()),
                profile.onboarding_complete,
            ],
        )?;
        tracing::info!("profile saved");
        Ok(())
    }

    pub fn load_profile(&self) -> Result<Option<UserProfile>> {
        let row = self
            .conn
            .query_row(
                "SELECT name, age, cycle_length, last_period_date, onboarding_complete FROM profile WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, u32>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, bool>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((name, age, cycle_length, last_period, onboarding_complete)) = row else {
            return Ok(None);
        };
        let last_period_date = last_period
            .map(|raw| parse_date("profile", &raw))
            .transpose()?;

        Ok(Some(UserProfile {
            name,
            age,
            cycle_length,
            last_period_date,
            onboarding_complete,
        }))
    }

    /// Append one symptom entry and return its row id.
    pub fn append_entry(&self, entry: &SymptomEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO symptom_entries (date, cycle_day, phase, symptom, intensity, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.date.format(DATE_FORMAT).to_string(),
                entry.cycle_day,
                entry.phase.label(),
                entry.symptom.name(),
                entry.intensity.value(),
                entry.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All entries in insertion order.
    pub fn load_entries(&self) -> Result<Vec<SymptomEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, cycle_day, phase, symptom, intensity, notes
             FROM symptom_entries
             ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<u32>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (date, cycle_day, phase, symptom, intensity, notes) = row?;
            entries.push(SymptomEntry {
                date: parse_date("symptom_entries", &date)?,
                cycle_day,
                phase: phase
                    .parse::<Phase>()
                    .map_err(|e| corrupt("symptom_entries", e))?,
                symptom: Symptom::from_name(&symptom),
                intensity: Intensity::new(intensity).map_err(|e| corrupt("symptom_entries", e))?,
                notes,
            });
        }
        Ok(entries)
    }

    pub fn append_message(&self, message: &ConversationMessage) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO messages (role, content) VALUES (?1, ?2)",
            params![message.role.as_str(), message.content],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Full transcript in insertion order.
    pub fn load_messages(&self) -> Result<Vec<ConversationMessage>> {
        let mut stmt = self
            .conn
            .prepare("SELECT role, content FROM messages ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut messages = Vec::new();
        for row in rows {
            let (role, content) = row?;
            let role = role.parse::<Role>().map_err(|e| corrupt("messages", e))?;
            messages.push(ConversationMessage { role, content });
        }
        Ok(messages)
    }

    /// Rebuild a session from the stored profile, log and messages.
    pub fn load_session(&self) -> Result<Session> {
        let mut session = Session::new();
        session.profile = self.load_profile()?;
        session.log = self.load_entries()?.into();
        session.messages = self.load_messages()?;
        tracing::debug!(
            entries = session.log.len(),
            messages = session.messages.len(),
            "session loaded"
        );
        Ok(session)
    }

    /// Persist what changed in `session` since it was loaded.
    ///
    /// The log and transcript are append-only, so only entries from index
    /// `from_entries` and messages from index `from_messages` are written.
    /// The profile is always rewritten.
    pub fn save_new(&self, session: &Session, from_entries: usize, from_messages: usize) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        if let Some(profile) = &session.profile {
            self.save_profile(profile)?;
        }
        let entries = session.log.entries().get(from_entries..).unwrap_or_default();
        for entry in entries {
            self.append_entry(entry)?;
        }
        let messages = session.messages.get(from_messages..).unwrap_or_default();
        for message in messages {
            self.append_message(message)?;
        }

        tx.commit()?;
        tracing::info!(entries = entries.len(), messages = messages.len(), "session saved");
        Ok(())
    }
}

fn parse_date(table: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| corrupt(table, format!("date '{raw}': {e}")))
}

fn corrupt(table: &str, message: impl ToString) -> crate::error::CoreError {
    DatabaseError::CorruptRow {
        table: table.to_string(),
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::InsightGenerator;
    use crate::profile::OnboardingForm;
    use crate::storage::CycleConfig;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile {
            name: "Ada".to_string(),
            age: 30,
            cycle_length: 28,
            last_period_date: Some(date(1)),
            onboarding_complete: true,
        }
    }

    #[test]
    fn empty_database_has_no_profile() {
        let db = Database::open_memory().unwrap();
        assert!(db.load_profile().unwrap().is_none());
        assert!(db.load_entries().unwrap().is_empty());
    }

    #[test]
    fn profile_is_replaced_not_duplicated() {
        let db = Database::open_memory().unwrap();
        db.save_profile(&profile()).unwrap();
        let updated = UserProfile {
            cycle_length: 32,
            last_period_date: None,
            ..profile()
        };
        db.save_profile(&updated).unwrap();
        assert_eq!(db.load_profile().unwrap(), Some(updated));
    }

    #[test]
    fn entries_keep_order_and_unknown_cycle_day() {
        let db = Database::open_memory().unwrap();
        let first = SymptomEntry::stamped(&profile(), date(20), Symptom::Cramps, Intensity::new(4).unwrap(), "ow");
        let second = SymptomEntry {
            cycle_day: None,
            phase: Phase::Unknown,
            ..SymptomEntry::stamped(&profile(), date(21), Symptom::other("Insomnia"), Intensity::new(2).unwrap(), "")
        };
        db.append_entry(&first).unwrap();
        db.append_entry(&second).unwrap();
        assert_eq!(db.load_entries().unwrap(), vec![first, second]);
    }

    #[test]
    fn corrupt_phase_is_reported() {
        let db = Database::open_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO symptom_entries (date, cycle_day, phase, symptom, intensity)
                 VALUES ('2024-03-01', 1, 'Spring', 'Cramps', 3)",
                [],
            )
            .unwrap();
        assert!(matches!(
            db.load_entries(),
            Err(crate::error::CoreError::Database(DatabaseError::CorruptRow { .. }))
        ));
    }

    #[test]
    fn save_new_writes_only_the_tail() {
        let db = Database::open_memory().unwrap();
        let mut session = db.load_session().unwrap();
        let form = OnboardingForm {
            name: "Ada".to_string(),
            last_period_date: Some(date(1)),
            ..OnboardingForm::default()
        };
        session.complete_onboarding(&form, &CycleConfig::default()).unwrap();
        db.save_new(&session, 0, 0).unwrap();

        let mut reloaded = db.load_session().unwrap();
        let (entries, messages) = (reloaded.log.len(), reloaded.messages.len());
        assert_eq!(messages, 1);

        let mut insights = InsightGenerator::new(Some(2));
        reloaded
            .log_symptom(date(4), Symptom::Headache, Intensity::new(3).unwrap(), "", &mut insights, 3)
            .unwrap();
        db.save_new(&reloaded, entries, messages).unwrap();

        let again = db.load_session().unwrap();
        assert_eq!(again.profile, reloaded.profile);
        assert_eq!(again.log, reloaded.log);
        assert_eq!(again.messages, reloaded.messages);
    }
}
