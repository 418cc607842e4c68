//! Typed candidate records built from raw delimited rows.
//!
//! Every field is optional; an empty cell is an absent field. Candidates are
//! validated and defaulted by the ingestion strategies before they become
//! domain entities.

use fieldops_clients::ClientStatus;

use crate::delimited::DelimitedTable;

/// Raw inventory row: name, brand, description, serial, photo URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryCandidate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub image_url: Option<String>,
}

impl InventoryCandidate {
    /// Map a row by position. A brand, when present, prefixes the description.
    pub fn from_fields(fields: &[String]) -> Self {
        let brand = cell(fields, 1);
        let description = cell(fields, 2);
        let description = match brand {
            Some(brand) => Some(format!("{brand} - {}", description.unwrap_or_default())),
            None => description,
        };

        Self {
            name: cell(fields, 0),
            description,
            serial_number: cell(fields, 3),
            image_url: cell(fields, 4),
        }
    }
}

pub fn inventory_candidates(table: &DelimitedTable) -> Vec<InventoryCandidate> {
    table
        .rows
        .iter()
        .map(|row| InventoryCandidate::from_fields(row))
        .collect()
}

/// Raw client row.
///
/// `id`, `total_visits`, `last_visit_date` and `color_class` are read so that
/// re-imported exports parse, but ingestion never copies them onto a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientCandidate {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub status: Option<ClientStatus>,
    pub id: Option<String>,
    pub total_visits: Option<String>,
    pub last_visit_date: Option<String>,
    pub color_class: Option<String>,
}

impl ClientCandidate {
    pub fn is_empty(&self) -> bool {
        *self == ClientCandidate::default()
    }

    fn set(&mut self, column: ClientColumn, value: Option<String>) {
        match column {
            ClientColumn::Name => self.name = value,
            ClientColumn::TaxId => self.tax_id = value,
            ClientColumn::ContactName => self.contact_name = value,
            ClientColumn::Email => self.email = value,
            ClientColumn::Phone => self.phone = value,
            ClientColumn::Address => self.address = value,
            ClientColumn::PhotoUrl => self.photo_url = value,
            ClientColumn::Status => self.status = value.as_deref().and_then(parse_status),
            ClientColumn::Id => self.id = value,
            ClientColumn::TotalVisits => self.total_visits = value,
            ClientColumn::LastVisitDate => self.last_visit_date = value,
            ClientColumn::ColorClass => self.color_class = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClientColumn {
    Name,
    TaxId,
    ContactName,
    Email,
    Phone,
    Address,
    PhotoUrl,
    Status,
    Id,
    TotalVisits,
    LastVisitDate,
    ColorClass,
}

/// Column order assumed when no header cell is recognised.
const POSITIONAL_CLIENT_COLUMNS: [ClientColumn; 7] = [
    ClientColumn::Name,
    ClientColumn::TaxId,
    ClientColumn::ContactName,
    ClientColumn::Email,
    ClientColumn::Phone,
    ClientColumn::Address,
    ClientColumn::PhotoUrl,
];

fn client_column(header: &str) -> Option<ClientColumn> {
    let key: String = header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .map(fold_accent)
        .flat_map(char::to_lowercase)
        .collect();

    let column = match key.as_str() {
        "name" | "nombre" | "client" | "cliente" | "razonsocial" | "clientname" => ClientColumn::Name,
        "nit" | "taxid" | "rut" | "rfc" | "vat" => ClientColumn::TaxId,
        "contact" | "contactname" | "contacto" | "nombrecontacto" => ClientColumn::ContactName,
        "email" | "mail" | "correo" | "correoelectronico" => ClientColumn::Email,
        "phone" | "telefono" | "tel" | "celular" | "mobile" => ClientColumn::Phone,
        "address" | "direccion" => ClientColumn::Address,
        "photo" | "photourl" | "foto" | "urlfoto" | "logo" => ClientColumn::PhotoUrl,
        "status" | "estado" => ClientColumn::Status,
        "id" => ClientColumn::Id,
        "totalvisits" | "visits" | "visitas" => ClientColumn::TotalVisits,
        "lastvisitdate" | "lastvisit" | "ultimavisita" => ClientColumn::LastVisitDate,
        "color" | "colorclass" => ClientColumn::ColorClass,
        _ => return None,
    };
    Some(column)
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'Á' => 'a',
        'é' | 'É' => 'e',
        'í' | 'Í' => 'i',
        'ó' | 'Ó' => 'o',
        'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        other => other,
    }
}

fn parse_status(raw: &str) -> Option<ClientStatus> {
    match raw.trim().to_lowercase().as_str() {
        "active" | "activo" | "activa" => Some(ClientStatus::Active),
        "inactive" | "inactivo" | "inactiva" => Some(ClientStatus::Inactive),
        _ => None,
    }
}

/// Map rows to client candidates using the header names.
///
/// Unknown columns are ignored. When no header cell is recognised the columns
/// are read positionally: name, tax id, contact, email, phone, address, photo.
pub fn client_candidates(table: &DelimitedTable) -> Vec<ClientCandidate> {
    let mapped: Vec<(usize, ClientColumn)> = table
        .header
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| client_column(h).map(|col| (idx, col)))
        .collect();
    let columns: Vec<(usize, ClientColumn)> = if mapped.is_empty() {
        POSITIONAL_CLIENT_COLUMNS.iter().copied().enumerate().collect()
    } else {
        mapped
    };

    table
        .rows
        .iter()
        .map(|row| {
            let mut candidate = ClientCandidate::default();
            for &(idx, column) in &columns {
                candidate.set(column, cell(row, idx));
            }
            candidate
        })
        .collect()
}

fn cell(fields: &[String], idx: usize) -> Option<String> {
    fields
        .get(idx)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
