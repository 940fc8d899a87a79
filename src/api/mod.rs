// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    chain::Receipt,
    models::{
        BalanceResponse, DepositRequest, LoginRequest, LoginResponse, LogoutResponse,
        NewPersonRequest, NewProductRequest, Person, PersonResponse, PersonsResponse, Product,
        ProductsResponse, Purchase, PurchasesResponse, RegisterPurchaseRequest,
        ReleaseAllResponse, ReleaseRequest, ReleasedPayee, SetPersonActiveRequest,
        SetProductActiveRequest, TxResponse, UpdateBasicDataRequest, UpdateProductRequest,
        UpdateRoleRequest, UpdateSalaryRequest, WithdrawRequest,
    },
    state::AppState,
};

pub mod payments;
pub mod personnel;
pub mod session;
pub mod store;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/session/login", post(session::login))
        .route("/api/session/logout", post(session::logout))
        .route(
            "/api/store/products",
            get(store::list_products).post(store::create_product),
        )
        .route(
            "/api/store/products/{id}",
            put(store::update_product).delete(store::delete_product),
        )
        .route(
            "/api/store/products/{id}/active",
            post(store::set_product_active),
        )
        .route(
            "/api/store/purchases",
            get(store::list_purchases).post(store::register_purchase),
        )
        .route("/api/store/balance", get(store::contract_balance))
        .route("/api/store/withdraw", post(store::withdraw))
        .route("/api/payments/deposit", post(payments::deposit))
        .route("/api/payments/release", post(payments::release))
        .route("/api/payments/release-all", post(payments::release_all))
        .route("/api/payments/balance", get(payments::balance))
        .route(
            "/api/personnel",
            get(personnel::list_persons).post(personnel::create_person),
        )
        .route(
            "/api/personnel/wallet/{wallet}",
            get(personnel::person_by_wallet),
        )
        .route("/api/personnel/{id}/role", put(personnel::update_role))
        .route("/api/personnel/{id}/salary", put(personnel::update_salary))
        .route("/api/personnel/{id}/active", put(personnel::set_active))
        .route("/api/personnel/{id}/basic", put(personnel::update_basic_data))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        session::login,
        session::logout,
        store::list_products,
        store::create_product,
        store::update_product,
        store::set_product_active,
        store::delete_product,
        store::list_purchases,
        store::register_purchase,
        store::contract_balance,
        store::withdraw,
        payments::deposit,
        payments::release,
        payments::release_all,
        payments::balance,
        personnel::list_persons,
        personnel::create_person,
        personnel::person_by_wallet,
        personnel::update_role,
        personnel::update_salary,
        personnel::set_active,
        personnel::update_basic_data
    ),
    components(
        schemas(
            Product,
            Purchase,
            Person,
            Receipt,
            LoginRequest,
            LoginResponse,
            LogoutResponse,
            NewProductRequest,
            RegisterPurchaseRequest,
            UpdateProductRequest,
            SetProductActiveRequest,
            WithdrawRequest,
            NewPersonRequest,
            UpdateRoleRequest,
            UpdateSalaryRequest,
            SetPersonActiveRequest,
            UpdateBasicDataRequest,
            DepositRequest,
            ReleaseRequest,
            ReleasedPayee,
            TxResponse,
            ProductsResponse,
            PurchasesResponse,
            PersonsResponse,
            PersonResponse,
            BalanceResponse,
            ReleaseAllResponse
        )
    ),
    tags(
        (name = "Session", description = "Wallet login and logout"),
        (name = "Store", description = "Product catalogue and store funds"),
        (name = "Payments", description = "Payout splitter operations"),
        (name = "Personnel", description = "On-chain personnel registry")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{extract::State, http::StatusCode, Json};

    use crate::{
        chain::{AccountSelector, ChainError},
        models::{
            NewPersonRequest, NewProductRequest, Purchase, UpdateBasicDataRequest,
            UpdateProductRequest,
        },
        services::{PayoutApi, RegistryApi, StoreApi},
        sessions::CurrentSession,
    };

    const KNOWN_WALLET: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    fn receipt() -> Receipt {
        Receipt {
            tx_hash: "0xabc".into(),
            block_number: 7,
            gas_used: 21_000,
            status: true,
        }
    }

    fn person() -> Person {
        Person {
            id: "1".into(),
            email: "ana@example.test".into(),
            username: "ana".into(),
            role: "manager".into(),
            image_url: String::new(),
            salary: "1200".into(),
            active: true,
            wallet: KNOWN_WALLET.into(),
        }
    }

    struct MockStore;

    #[async_trait]
    impl StoreApi for MockStore {
        async fn products(&self) -> Result<Vec<Product>, ChainError> {
            Ok(Vec::new())
        }
        async fn add_product(&self, _request: NewProductRequest) -> Result<Receipt, ChainError> {
            Ok(receipt())
        }
        async fn update_product(
            &self,
            _id: u64,
            _request: UpdateProductRequest,
        ) -> Result<Receipt, ChainError> {
            Ok(receipt())
        }
        async fn set_product_active(&self, _id: u64, _active: bool) -> Result<Receipt, ChainError> {
            Ok(receipt())
        }
        async fn delete_product(&self, _id: u64) -> Result<Receipt, ChainError> {
            Ok(receipt())
        }
        async fn register_purchase(
            &self,
            _wallet: &str,
            _product_id: u64,
            _amount: &str,
        ) -> Result<Receipt, ChainError> {
            Ok(receipt())
        }
        async fn purchases_by_user(&self, wallet: &str) -> Result<Vec<Purchase>, ChainError> {
            Ok(vec![Purchase {
                id: "1".into(),
                product_id: "2".into(),
                buyer: wallet.to_string(),
                amount: "0.005".into(),
                timestamp: 1_700_000_000,
            }])
        }
        async fn contract_balance(&self) -> Result<String, ChainError> {
            Ok("1.5".into())
        }
        async fn withdraw(&self, _amount: &str) -> Result<Receipt, ChainError> {
            Ok(receipt())
        }
    }

    struct MockRegistry;

    #[async_trait]
    impl RegistryApi for MockRegistry {
        async fn create_person(&self, _request: NewPersonRequest) -> Result<Receipt, ChainError> {
            Ok(receipt())
        }
        async fn person_by_wallet(&self, wallet: &str) -> Result<Option<Person>, ChainError> {
            Ok((wallet == KNOWN_WALLET).then(person))
        }
        async fn all_persons(&self) -> Result<Vec<Person>, ChainError> {
            Ok(vec![person()])
        }
        async fn update_role(&self, _id: u64, _role: &str) -> Result<Receipt, ChainError> {
            Ok(receipt())
        }
        async fn update_salary(&self, _id: u64, _salary: &str) -> Result<Receipt, ChainError> {
            Ok(receipt())
        }
        async fn set_active(&self, _id: u64, _active: bool) -> Result<Receipt, ChainError> {
            Ok(receipt())
        }
        async fn update_basic_data(
            &self,
            _id: u64,
            _request: UpdateBasicDataRequest,
        ) -> Result<Receipt, ChainError> {
            Ok(receipt())
        }
    }

    struct MockPayout;

    #[async_trait]
    impl PayoutApi for MockPayout {
        async fn deposit(
            &self,
            _amount: &str,
            _selector: AccountSelector,
        ) -> Result<Receipt, ChainError> {
            Ok(receipt())
        }
        async fn release(&self, selector: AccountSelector) -> Result<Receipt, ChainError> {
            match selector {
                AccountSelector::Index(i) if i > 1 => Err(ChainError::AccountNotFound(format!(
                    "account #{i} is outside the configured roster"
                ))),
                _ => Ok(receipt()),
            }
        }
        async fn release_all(&self) -> Result<Vec<ReleasedPayee>, ChainError> {
            Ok(Vec::new())
        }
        async fn balance(&self) -> Result<String, ChainError> {
            Ok("3".into())
        }
    }

    fn mock_state() -> AppState {
        AppState::new(
            Arc::new(MockStore),
            Arc::new(MockRegistry),
            Arc::new(MockPayout),
        )
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(mock_state());
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn login_creates_a_session_for_registered_wallets() {
        let state = mock_state();
        let response = session::login(
            State(state.clone()),
            Json(LoginRequest {
                wallet: KNOWN_WALLET.into(),
            }),
        )
        .await
        .unwrap();

        assert!(response.0.success);
        assert_eq!(response.0.person.username, "ana");
        assert!(state
            .sessions
            .read()
            .await
            .get(&response.0.token)
            .is_some());
    }

    #[tokio::test]
    async fn login_rejects_unknown_wallets_with_401() {
        let err = session::login(
            State(mock_state()),
            Json(LoginRequest {
                wallet: "0x0000000000000000000000000000000000000009".into(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Wallet not registered");
    }

    #[tokio::test]
    async fn purchases_are_scoped_to_the_session_wallet() {
        let state = mock_state();
        let login = session::login(
            State(state.clone()),
            Json(LoginRequest {
                wallet: KNOWN_WALLET.into(),
            }),
        )
        .await
        .unwrap();

        let session = state.sessions.read().await.get(&login.0.token).unwrap();
        let response = store::list_purchases(State(state.clone()), CurrentSession(session))
            .await
            .unwrap();

        assert_eq!(response.0.purchases.len(), 1);
        assert_eq!(response.0.purchases[0].buyer, KNOWN_WALLET);
    }

    #[tokio::test]
    async fn release_with_unknown_account_maps_to_400() {
        let err = payments::release(
            State(mock_state()),
            Json(ReleaseRequest { account: Some(9) }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
