//! Client import: natural key = tax id, falling back to email.

use fieldops_clients::{
    CLIENT_ID_PREFIX, COLOR_PALETTE, Client, ClientStatus, initials, next_sequence, pick_color,
    sequential_client_id,
};
use fieldops_core::RandomSource;

use crate::candidate::{ClientCandidate, client_candidates};
use crate::delimited::parse_delimited;
use crate::engine::{IngestReport, Resolution, UpsertStrategy, ingest};
use crate::error::ParseError;

/// Upsert strategy for clients.
///
/// A match is updated in place: every field the row supplies overwrites the
/// stored one, except the system id, visit statistics and display colour.
/// Unmatched rows become new `Active` clients with the next sequential id.
pub struct ClientImport<'a, R: ?Sized> {
    rng: &'a mut R,
    id_prefix: String,
    /// `None` once the numeric id range is exhausted.
    next_sequence: Option<u64>,
}

impl<'a, R: RandomSource + ?Sized> ClientImport<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self::with_prefix(rng, CLIENT_ID_PREFIX)
    }

    pub fn with_prefix(rng: &'a mut R, id_prefix: impl Into<String>) -> Self {
        Self {
            rng,
            id_prefix: id_prefix.into(),
            next_sequence: Some(1),
        }
    }
}

impl<R: RandomSource + ?Sized> UpsertStrategy for ClientImport<'_, R> {
    type Entity = Client;
    type Candidate = ClientCandidate;

    fn prepare(&mut self, existing: &[Client]) {
        self.next_sequence = next_sequence(existing, &self.id_prefix);
    }

    fn admit(&self, candidate: ClientCandidate) -> Option<ClientCandidate> {
        (!candidate.is_empty()).then_some(candidate)
    }

    /// Tax id first; email only when the tax id is absent or unmatched.
    /// Among several clients sharing a key, the first in collection order wins.
    fn find_match(&self, collection: &[Client], candidate: &ClientCandidate) -> Option<usize> {
        let by_tax_id = candidate
            .tax_id
            .as_deref()
            .and_then(|tax_id| collection.iter().position(|c| c.has_tax_id(tax_id)));
        by_tax_id.or_else(|| {
            let email = candidate.email.as_deref()?;
            collection.iter().position(|c| c.has_email(email))
        })
    }

    fn resolve(&mut self, existing: &Client, candidate: ClientCandidate) -> Resolution<Client> {
        let mut merged = existing.clone();

        if let Some(name) = candidate.name {
            merged.initials = initials(&name);
            merged.name = name;
        }
        overwrite(&mut merged.tax_id, candidate.tax_id);
        overwrite(&mut merged.contact_name, candidate.contact_name);
        overwrite(&mut merged.email, candidate.email);
        overwrite(&mut merged.phone, candidate.phone);
        overwrite(&mut merged.address, candidate.address);
        overwrite(&mut merged.photo_url, candidate.photo_url);
        if let Some(status) = candidate.status {
            merged.status = status;
        }
        if merged.color_class.is_empty() {
            merged.color_class = COLOR_PALETTE[0].to_string();
        }

        Resolution::Replace(merged)
    }

    fn create(&mut self, candidate: ClientCandidate) -> Option<Client> {
        let Some(n) = self.next_sequence else {
            tracing::warn!(prefix = %self.id_prefix, "client id range exhausted; row dropped");
            return None;
        };
        let id = sequential_client_id(&self.id_prefix, n);
        self.next_sequence = n.checked_add(1);

        let mut client = Client::new(
            id,
            candidate.name.unwrap_or_default(),
            pick_color(&mut *self.rng),
        );
        client.tax_id = candidate.tax_id.unwrap_or_default();
        client.contact_name = candidate.contact_name.unwrap_or_default();
        client.email = candidate.email.unwrap_or_default();
        client.phone = candidate.phone.unwrap_or_default();
        client.address = candidate.address.unwrap_or_default();
        client.photo_url = candidate.photo_url.unwrap_or_default();
        client.status = ClientStatus::Active;
        Some(client)
    }
}

fn overwrite(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// Parse `text` and upsert it into `existing`.
pub fn import_clients<R: RandomSource + ?Sized>(
    existing: &[Client],
    text: &str,
    rng: &mut R,
    id_prefix: &str,
) -> Result<IngestReport<Client>, ParseError> {
    let table = parse_delimited(text)?;
    let candidates = client_candidates(&table);
    let mut strategy = ClientImport::with_prefix(rng, id_prefix);
    Ok(ingest(existing, candidates, &mut strategy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldops_core::{ClientId, CyclingRandom};

    fn stored(id: &str, name: &str, tax_id: &str, email: &str) -> Client {
        let mut client = Client::new(ClientId::from(id), name, COLOR_PALETTE[2]);
        client.tax_id = tax_id.to_string();
        client.email = email.to_string();
        client.total_visits = 7;
        client.last_visit_date = "02/02/2024".to_string();
        client
    }

    fn run(existing: &[Client], text: &str) -> IngestReport<Client> {
        import_clients(existing, text, &mut CyclingRandom::new(), CLIENT_ID_PREFIX).unwrap()
    }

    #[test]
    fn tax_id_match_updates_but_preserves_identity_and_stats() {
        let existing = vec![stored("CL-004", "Acme Corp", "900-1", "ops@acme.test")];
        let text = "name,nit,email,phone,id,totalVisits,colorClass\n\
                    Beta Industries,900-1,new@beta.test,555-0100,CL-999,0,bg-red\n";
        let report = run(&existing, text);

        assert_eq!(report.updated, 1);
        assert_eq!(report.created, 0);
        let client = &report.collection[0];
        assert_eq!(client.id.as_str(), "CL-004");
        assert_eq!(client.total_visits, 7);
        assert_eq!(client.last_visit_date, "02/02/2024");
        assert_eq!(client.color_class, COLOR_PALETTE[2]);
        assert_eq!(client.name, "Beta Industries");
        assert_eq!(client.initials, "BI");
        assert_eq!(client.email, "new@beta.test");
        assert_eq!(client.phone, "555-0100");
    }

    #[test]
    fn absent_fields_do_not_overwrite() {
        let mut acme = stored("CL-001", "Acme Corp", "900-1", "ops@acme.test");
        acme.address = "Main St 1".to_string();
        let report = run(&[acme], "nit;telefono\n900-1;555\n");

        let client = &report.collection[0];
        assert_eq!(client.name, "Acme Corp");
        assert_eq!(client.initials, "AC");
        assert_eq!(client.address, "Main St 1");
        assert_eq!(client.phone, "555");
    }

    #[test]
    fn email_is_the_fallback_key() {
        let existing = vec![stored("CL-001", "Acme Corp", "", "Ops@Acme.test")];
        let report = run(&existing, "name,email\nAcme Holdings,ops@acme.test\n");

        assert_eq!(report.updated, 1);
        assert_eq!(report.collection.len(), 1);
        assert_eq!(report.collection[0].name, "Acme Holdings");
    }

    #[test]
    fn unmatched_rows_get_next_sequential_id() {
        let existing = vec![
            stored("CL-002", "Acme", "1", ""),
            stored("legacy-x", "Old", "2", ""),
            stored("CL-010", "Zeta", "3", ""),
        ];
        let report = run(&existing, "name,nit\nNew One,4\nNew Two,5\n");

        assert_eq!(report.created, 2);
        let ids: Vec<_> = report.collection[3..].iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["CL-011", "CL-012"]);
        for client in &report.collection[3..] {
            assert_eq!(client.status, ClientStatus::Active);
            assert_eq!(client.total_visits, 0);
            assert_eq!(client.last_visit_date, "-");
        }
    }

    #[test]
    fn new_clients_take_colours_from_the_random_source() {
        let text = "name\nA\nB\nC\n";
        let mut rng = CyclingRandom::starting_at(1);
        let report = import_clients(&[], text, &mut rng, CLIENT_ID_PREFIX).unwrap();

        let colours: Vec<_> = report.collection.iter().map(|c| c.color_class.as_str()).collect();
        assert_eq!(colours, vec![COLOR_PALETTE[1], COLOR_PALETTE[2], COLOR_PALETTE[3]]);
    }

    #[test]
    fn duplicate_key_within_batch_updates_first_occurrence() {
        let report = run(&[], "name,nit\nFirst,77\nSecond,77\n");

        assert_eq!(report.created, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(report.collection.len(), 1);
        assert_eq!(report.collection[0].name, "Second");
        assert_eq!(report.collection[0].id.as_str(), "CL-001");
    }

    #[test]
    fn exhausted_id_range_drops_new_rows_without_panicking() {
        let top = stored(&format!("CL-{}", u64::MAX), "Acme", "1", "");
        let report = run(&[top], "name,nit\nAcme Holdings,1\nNew,2\n");

        assert_eq!(report.updated, 1);
        assert_eq!(report.created, 0);
        assert_eq!(report.collection.len(), 1);
        assert_eq!(report.collection[0].name, "Acme Holdings");
    }

    #[test]
    fn last_free_id_is_still_used() {
        let below_top = stored(&format!("CL-{}", u64::MAX - 1), "Acme", "1", "");
        let report = run(&[below_top], "name,nit\nNew,2\nNewer,3\n");

        assert_eq!(report.created, 1);
        assert_eq!(report.collection[1].id.as_str(), format!("CL-{}", u64::MAX));
    }

    #[test]
    fn blank_rows_are_dropped() {
        let report = run(&[], "name,nit\n,\nAcme,1\n");

        assert_eq!(report.processed(), 1);
        assert_eq!(report.collection.len(), 1);
    }

    #[test]
    fn status_column_is_honoured_on_update() {
        let existing = vec![stored("CL-001", "Acme", "1", "")];
        let report = run(&existing, "nit,estado\n1,Inactivo\n");

        assert_eq!(report.collection[0].status, ClientStatus::Inactive);
    }
}
