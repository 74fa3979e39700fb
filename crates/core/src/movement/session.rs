//! In-progress movement entry.

use std::collections::HashMap;

use chrono::{Local, NaiveDateTime};
use gestion_shared::types::{BankId, ClientId, CompanyId, LineId};
use thiserror::Error;

use super::gate::{CatalogRef, HeaderSelection};
use super::line::RawLine;
use crate::storage::LineUpload;

/// Timestamp text format of the entry form.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Session editing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No line with this id.
    #[error("line {0} not found")]
    UnknownLine(LineId),
}

/// Header, lines, pending uploads and the confirmation toggle of one entry form.
///
/// There is always at least one line.
#[derive(Debug, Clone)]
pub struct EntrySession {
    timestamp: String,
    header: HeaderSelection,
    lines: Vec<RawLine>,
    uploads: HashMap<LineId, LineUpload>,
    confirmed: bool,
}

impl Default for EntrySession {
    fn default() -> Self {
        Self::new()
    }
}

fn now_text() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

impl EntrySession {
    /// A fresh session: current time, empty header, one blank line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timestamp: now_text(),
            header: HeaderSelection::default(),
            lines: vec![RawLine::blank()],
            uploads: HashMap::new(),
            confirmed: false,
        }
    }

    /// Timestamp text as entered.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Replaces the timestamp text.
    pub fn set_timestamp(&mut self, text: impl Into<String>) {
        self.timestamp = text.into();
    }

    /// Parses the timestamp text.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the text is not `dd/mm/YYYY HH:MM:SS`.
    pub fn parsed_timestamp(&self) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(self.timestamp.trim(), TIMESTAMP_FORMAT)
    }

    /// Header selections.
    #[must_use]
    pub fn header(&self) -> &HeaderSelection {
        &self.header
    }

    /// Sets or clears the client.
    pub fn select_client(&mut self, client: Option<CatalogRef<ClientId>>) {
        self.header.client = client;
    }

    /// Sets or clears the company.
    pub fn select_company(&mut self, company: Option<CatalogRef<CompanyId>>) {
        self.header.company = company;
    }

    /// Sets or clears the bank.
    pub fn select_bank(&mut self, bank: Option<CatalogRef<BankId>>) {
        self.header.bank = bank;
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[RawLine] {
        &self.lines
    }

    /// Looks up a line.
    #[must_use]
    pub fn line(&self, id: LineId) -> Option<&RawLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    fn position(&self, id: LineId) -> Result<usize, SessionError> {
        self.lines
            .iter()
            .position(|line| line.id == id)
            .ok_or(SessionError::UnknownLine(id))
    }

    /// Appends a blank line.
    pub fn add_line(&mut self) -> LineId {
        let line = RawLine::blank();
        let id = line.id;
        self.lines.push(line);
        id
    }

    /// Appends a copy of the last line under a new id. The attachment is not copied.
    pub fn duplicate_last(&mut self) -> LineId {
        let line = self.lines.last().map_or_else(RawLine::blank, RawLine::duplicate);
        let id = line.id;
        self.lines.push(line);
        id
    }

    /// Edits a line in place. The line id cannot be changed.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` if no line has this id.
    pub fn update_line(
        &mut self,
        id: LineId,
        edit: impl FnOnce(&mut RawLine),
    ) -> Result<(), SessionError> {
        let index = self.position(id)?;
        let line = &mut self.lines[index];
        edit(line);
        line.id = id;
        Ok(())
    }

    /// Removes a line and its pending upload. Removing the only line leaves a blank one.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` if no line has this id.
    pub fn remove_line(&mut self, id: LineId) -> Result<(), SessionError> {
        let index = self.position(id)?;
        self.lines.remove(index);
        self.uploads.remove(&id);
        if self.lines.is_empty() {
            self.lines.push(RawLine::blank());
        }
        Ok(())
    }

    /// Replaces all lines with a single blank line and drops every upload.
    pub fn clear_lines(&mut self) {
        self.lines = vec![RawLine::blank()];
        self.uploads.clear();
    }

    /// Attaches a file to a line, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` if no line has this id.
    pub fn attach(&mut self, id: LineId, upload: LineUpload) -> Result<(), SessionError> {
        self.position(id)?;
        self.uploads.insert(id, upload);
        Ok(())
    }

    /// Removes a line's file.
    pub fn detach(&mut self, id: LineId) -> Option<LineUpload> {
        self.uploads.remove(&id)
    }

    /// A line's pending file.
    #[must_use]
    pub fn upload(&self, id: LineId) -> Option<&LineUpload> {
        self.uploads.get(&id)
    }

    /// Number of lines with a pending file.
    #[must_use]
    pub fn upload_count(&self) -> usize {
        self.uploads.len()
    }

    /// The confirmation toggle.
    #[must_use]
    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    /// Sets the confirmation toggle.
    pub fn set_confirmed(&mut self, confirmed: bool) {
        self.confirmed = confirmed;
    }

    /// Clears lines, uploads and confirmation after a successful save.
    ///
    /// The header is kept so consecutive movements for the same client need no
    /// reselection; the timestamp moves to now.
    pub fn reset(&mut self) {
        self.clear_lines();
        self.confirmed = false;
        self.timestamp = now_text();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::line::AccountRef;

    fn upload() -> LineUpload {
        LineUpload::new("recibo.pdf", "application/pdf", vec![1u8, 2, 3])
    }

    #[test]
    fn test_new_session_has_one_blank_line() {
        let session = EntrySession::new();
        assert_eq!(session.lines().len(), 1);
        assert!(!session.confirmed());
        assert!(session.parsed_timestamp().is_ok());
        assert!(!session.header().is_complete());
    }

    #[test]
    fn test_parsed_timestamp() {
        let mut session = EntrySession::new();
        session.set_timestamp(" 05/03/2024 14:07:09 ");
        let parsed = session.parsed_timestamp().expect("valid timestamp");
        assert_eq!(parsed.to_string(), "2024-03-05 14:07:09");

        session.set_timestamp("2024-03-05 14:07");
        assert!(session.parsed_timestamp().is_err());
    }

    #[test]
    fn test_ids_survive_removal() {
        let mut session = EntrySession::new();
        let first = session.lines()[0].id;
        let second = session.add_line();
        let third = session.add_line();
        session.attach(third, upload()).unwrap();

        session.remove_line(second).unwrap();

        let ids: Vec<_> = session.lines().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![first, third]);
        assert!(session.upload(third).is_some());
    }

    #[test]
    fn test_remove_drops_upload_and_keeps_one_line() {
        let mut session = EntrySession::new();
        let only = session.lines()[0].id;
        session.attach(only, upload()).unwrap();

        session.remove_line(only).unwrap();

        assert_eq!(session.lines().len(), 1);
        assert_ne!(session.lines()[0].id, only);
        assert_eq!(session.upload_count(), 0);
    }

    #[test]
    fn test_duplicate_last_copies_fields_not_upload() {
        let mut session = EntrySession::new();
        let id = session.lines()[0].id;
        session
            .update_line(id, |line| {
                line.account = AccountRef::Label("Caja".into());
                line.amount = Some("10".into());
            })
            .unwrap();
        session.attach(id, upload()).unwrap();

        let copy = session.duplicate_last();

        let line = session.line(copy).unwrap();
        assert_eq!(line.account, AccountRef::Label("Caja".into()));
        assert_eq!(line.amount.as_deref(), Some("10"));
        assert!(session.upload(copy).is_none());
    }

    #[test]
    fn test_update_line_keeps_id() {
        let mut session = EntrySession::new();
        let id = session.lines()[0].id;
        session
            .update_line(id, |line| line.id = LineId::new())
            .unwrap();
        assert_eq!(session.lines()[0].id, id);
    }

    #[test]
    fn test_unknown_line_errors() {
        let mut session = EntrySession::new();
        let ghost = LineId::new();
        assert_eq!(
            session.remove_line(ghost),
            Err(SessionError::UnknownLine(ghost))
        );
        assert!(session.attach(ghost, upload()).is_err());
        assert!(session.update_line(ghost, |_| {}).is_err());
    }

    #[test]
    fn test_reset_keeps_header() {
        let mut session = EntrySession::new();
        session.select_client(Some(CatalogRef::new(ClientId::new(), "ACME")));
        session.add_line();
        session.set_confirmed(true);

        session.reset();

        assert_eq!(session.lines().len(), 1);
        assert!(!session.confirmed());
        assert!(session.header().client.is_some());
    }
}
