//! Whole-collection operations on clients.

use fieldops_core::{ClientId, DomainError, entity::position_of};

use crate::client::{Client, next_sequence, sequential_client_id, validate};

pub fn find_client<'a>(clients: &'a [Client], id: &ClientId) -> Option<&'a Client> {
    position_of(clients, id).map(|idx| &clients[idx])
}

/// Append a client, allocating a sequential id when its id is blank or taken.
pub fn add_client(
    clients: &[Client],
    mut client: Client,
    id_prefix: &str,
) -> Result<(Vec<Client>, ClientId), DomainError> {
    let blank = client.id.as_str().trim().is_empty();
    if blank || find_client(clients, &client.id).is_some() {
        let n = next_sequence(clients, id_prefix)
            .ok_or_else(|| DomainError::conflict(format!("no {id_prefix} client ids left")))?;
        client.id = sequential_client_id(id_prefix, n);
    }
    validate(&client)?;

    let id = client.id.clone();
    let mut next = clients.to_vec();
    next.push(client);
    Ok((next, id))
}

/// Replace the client with the same id. The id itself never changes.
pub fn update_client(clients: &[Client], client: Client) -> Result<Vec<Client>, DomainError> {
    validate(&client)?;
    let idx = position_of(clients, &client.id)
        .ok_or_else(|| DomainError::not_found(format!("client {}", client.id)))?;

    let mut next = clients.to_vec();
    next[idx] = client;
    Ok(next)
}

pub fn delete_client(clients: &[Client], id: &ClientId) -> Result<Vec<Client>, DomainError> {
    if find_client(clients, id).is_none() {
        return Err(DomainError::not_found(format!("client {id}")));
    }
    Ok(clients.iter().filter(|c| &c.id != id).cloned().collect())
}
