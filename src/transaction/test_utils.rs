use std::{marker::PhantomData, sync::Arc};

use axum::{
    body::Body,
    extract::{FromRef, Path},
    response::Response,
};
use axum_extra::extract::WithRejection;
use serde::de::DeserializeOwned;
use time::{OffsetDateTime, macros::datetime};

use crate::{
    AppState, Error, TransactionInput, db::Database, timezone::FrozenClock,
    transaction::state::TransactionState,
};

/// The instant every test transaction is stamped with.
pub const TEST_NOW: OffsetDateTime = datetime!(2025-06-01 14:30:15.25 +5:30);

pub fn must_create_test_state() -> TransactionState {
    let database = Database::open_in_memory().expect("could not create in-memory database");

    TransactionState::from_ref(&AppState::new(database, Arc::new(FrozenClock(TEST_NOW))))
}

pub fn must_create_transaction(state: &TransactionState, reference_number: &str) {
    let session = state.database.session().expect("could not start session");
    state
        .service
        .create_transaction(&session, &TransactionInput::new(reference_number, "card", 10.5))
        .expect("could not create test transaction");
}

/// Wrap `value` the way the router passes a path parameter to a handler.
pub fn path_param(value: &str) -> WithRejection<Path<String>, Error> {
    WithRejection(Path(value.to_owned()), PhantomData)
}

pub async fn parse_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("could not read response body");

    serde_json::from_slice(&body).expect("could not parse response body as JSON")
}
