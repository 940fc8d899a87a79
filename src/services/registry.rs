// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Personnel registry domain.
//!
//! People are stored entirely in the registry contract; this service reads
//! them for login/lookup and signs administrative updates with the admin
//! roster entry. An unknown wallet is not an error: lookups return `None` so
//! the session layer can answer 401 without groping through provider strings.

use std::str::FromStr;
use std::sync::Arc;

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};
use async_trait::async_trait;

use crate::{
    chain::{AccountSelector, ChainError, ContractArtifact, Receipt, TxGateway},
    models::{NewPersonRequest, Person, UpdateBasicDataRequest},
};

use super::decode;

/// Capability contract for the personnel domain.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    async fn create_person(&self, request: NewPersonRequest) -> Result<Receipt, ChainError>;
    async fn person_by_wallet(&self, wallet: &str) -> Result<Option<Person>, ChainError>;
    async fn all_persons(&self) -> Result<Vec<Person>, ChainError>;
    async fn update_role(&self, id: u64, role: &str) -> Result<Receipt, ChainError>;
    async fn update_salary(&self, id: u64, salary: &str) -> Result<Receipt, ChainError>;
    async fn set_active(&self, id: u64, active: bool) -> Result<Receipt, ChainError>;
    async fn update_basic_data(
        &self,
        id: u64,
        request: UpdateBasicDataRequest,
    ) -> Result<Receipt, ChainError>;
}

/// The on-chain personnel registry service.
pub struct RegistryService {
    gateway: Arc<TxGateway>,
    contract: ContractArtifact,
}

impl RegistryService {
    pub fn new(gateway: Arc<TxGateway>, contract: ContractArtifact) -> Self {
        Self { gateway, contract }
    }
}

#[async_trait]
impl RegistryApi for RegistryService {
    async fn create_person(&self, request: NewPersonRequest) -> Result<Receipt, ChainError> {
        let wallet = parse_address(&request.wallet)?;
        let salary = parse_salary(&request.salary)?;

        self.gateway
            .send(
                &self.contract,
                "createPerson",
                &[
                    DynSolValue::String(request.email),
                    DynSolValue::String(request.password),
                    DynSolValue::String(request.username),
                    DynSolValue::String(request.role),
                    DynSolValue::String(request.image_url),
                    DynSolValue::Uint(salary, 256),
                    DynSolValue::Address(wallet),
                ],
                AccountSelector::Admin,
            )
            .await
    }

    async fn person_by_wallet(&self, wallet: &str) -> Result<Option<Person>, ChainError> {
        let address = parse_address(wallet)?;

        let outputs = match self
            .gateway
            .read_only(&self.contract)
            .call("getPersonByWallet", &[DynSolValue::Address(address)])
            .await
        {
            Ok(outputs) => outputs,
            // The contract answers an unknown wallet with a revert
            Err(ChainError::TransactionReverted(_)) | Err(ChainError::TransactionRejected(_)) => {
                return Ok(None)
            }
            Err(other) => return Err(other),
        };

        let person = person_from_value(decode::single(&outputs, "person")?)?;
        // A zeroed row also means "not registered"
        Ok((person.id != "0").then_some(person))
    }

    async fn all_persons(&self) -> Result<Vec<Person>, ChainError> {
        let outputs = self
            .gateway
            .read_only(&self.contract)
            .call("getAllPersons", &[])
            .await?;

        let rows = decode::array(decode::single(&outputs, "persons")?, "persons")?;
        let mut persons = Vec::with_capacity(rows.len());
        for row in rows {
            let person = person_from_value(row)?;
            if person.id != "0" {
                persons.push(person);
            }
        }
        Ok(persons)
    }

    async fn update_role(&self, id: u64, role: &str) -> Result<Receipt, ChainError> {
        self.gateway
            .send(
                &self.contract,
                "updateRole",
                &[
                    DynSolValue::Uint(U256::from(id), 256),
                    DynSolValue::String(role.to_string()),
                ],
                AccountSelector::Admin,
            )
            .await
    }

    async fn update_salary(&self, id: u64, salary: &str) -> Result<Receipt, ChainError> {
        let salary = parse_salary(salary)?;
        self.gateway
            .send(
                &self.contract,
                "updateSalary",
                &[
                    DynSolValue::Uint(U256::from(id), 256),
                    DynSolValue::Uint(salary, 256),
                ],
                AccountSelector::Admin,
            )
            .await
    }

    async fn set_active(&self, id: u64, active: bool) -> Result<Receipt, ChainError> {
        self.gateway
            .send(
                &self.contract,
                "setActive",
                &[
                    DynSolValue::Uint(U256::from(id), 256),
                    DynSolValue::Bool(active),
                ],
                AccountSelector::Admin,
            )
            .await
    }

    async fn update_basic_data(
        &self,
        id: u64,
        request: UpdateBasicDataRequest,
    ) -> Result<Receipt, ChainError> {
        self.gateway
            .send(
                &self.contract,
                "updateBasicData",
                &[
                    DynSolValue::Uint(U256::from(id), 256),
                    DynSolValue::String(request.email),
                    DynSolValue::String(request.username),
                    DynSolValue::String(request.image_url),
                ],
                AccountSelector::Admin,
            )
            .await
    }
}

fn parse_address(raw: &str) -> Result<Address, ChainError> {
    Address::from_str(raw.trim()).map_err(|e| ChainError::InvalidAddress(format!("{raw}: {e}")))
}

fn parse_salary(raw: &str) -> Result<U256, ChainError> {
    U256::from_str(raw.trim())
        .map_err(|e| ChainError::InvalidAmount(format!("salary `{raw}`: {e}")))
}

fn person_from_value(value: &DynSolValue) -> Result<Person, ChainError> {
    let fields = decode::tuple(value, "person")?;
    Ok(Person {
        id: decode::uint(fields, 0, "person")?.to_string(),
        email: decode::string(fields, 1, "person")?,
        username: decode::string(fields, 2, "person")?,
        role: decode::string(fields, 3, "person")?,
        image_url: decode::string(fields, 4, "person")?,
        salary: decode::uint(fields, 5, "person")?.to_string(),
        active: decode::boolean(fields, 6, "person")?,
        wallet: decode::address(fields, 7, "person")?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_tuple(id: u64) -> DynSolValue {
        DynSolValue::Tuple(vec![
            DynSolValue::Uint(U256::from(id), 256),
            DynSolValue::String("ana@example.test".into()),
            DynSolValue::String("ana".into()),
            DynSolValue::String("manager".into()),
            DynSolValue::String("https://example.test/ana.png".into()),
            DynSolValue::Uint(U256::from(1200u64), 256),
            DynSolValue::Bool(true),
            DynSolValue::Address(Address::ZERO),
        ])
    }

    #[test]
    fn person_decodes_all_fields() {
        let person = person_from_value(&person_tuple(4)).unwrap();
        assert_eq!(person.id, "4");
        assert_eq!(person.username, "ana");
        assert_eq!(person.role, "manager");
        assert_eq!(person.salary, "1200");
        assert!(person.active);
    }

    #[test]
    fn salary_must_be_a_plain_integer() {
        assert!(parse_salary("1200").is_ok());
        assert!(matches!(
            parse_salary("12x0").unwrap_err(),
            ChainError::InvalidAmount(_)
        ));
    }

    #[test]
    fn malformed_person_row_is_an_encoding_error() {
        let err = person_from_value(&DynSolValue::String("nope".into())).unwrap_err();
        assert!(matches!(err, ChainError::Encoding(_)));
    }
}
