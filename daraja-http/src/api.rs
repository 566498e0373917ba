//! Object-safe interface over the Daraja operations.
//!
//! Application code that depends on [`MpesaApi`] instead of
//! [`DarajaClient`] can swap in a test double without standing up an HTTP
//! server.

use std::future::Future;
use std::pin::Pin;

use daraja::proto::{ApiResponse, RegisterUrlResponse, StkPushResponse, StkQueryResponse};
use daraja::request::{
    B2cRequest, BalanceQuery, C2bSimulate, ExpressQuery, ExpressRequest, RegisterUrls,
    ReversalRequest, TransactionStatusQuery,
};

use crate::client::DarajaClient;
use crate::error::DarajaError;

/// A pinned, boxed, `Send` future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The operations offered by the Daraja gateway.
pub trait MpesaApi: Send + Sync {
    /// Prompts a subscriber to pay.
    fn stk_push(&self, request: ExpressRequest)
    -> BoxFuture<'_, Result<StkPushResponse, DarajaError>>;

    /// Queries the outcome of a push payment.
    fn stk_push_query(
        &self,
        query: ExpressQuery,
    ) -> BoxFuture<'_, Result<StkQueryResponse, DarajaError>>;

    /// Pays a subscriber from a short code.
    fn b2c(&self, request: B2cRequest) -> BoxFuture<'_, Result<ApiResponse, DarajaError>>;

    /// Requests the balance of a short code.
    fn balance_query(&self, query: BalanceQuery)
    -> BoxFuture<'_, Result<ApiResponse, DarajaError>>;

    /// Looks up the status of a transaction.
    fn transaction_status(
        &self,
        query: TransactionStatusQuery,
    ) -> BoxFuture<'_, Result<ApiResponse, DarajaError>>;

    /// Reverses a transaction.
    fn reverse(&self, request: ReversalRequest) -> BoxFuture<'_, Result<ApiResponse, DarajaError>>;

    /// Registers validation and confirmation URLs.
    fn register_urls(
        &self,
        request: RegisterUrls,
    ) -> BoxFuture<'_, Result<RegisterUrlResponse, DarajaError>>;

    /// Simulates a customer payment.
    fn c2b_simulate(&self, request: C2bSimulate)
    -> BoxFuture<'_, Result<ApiResponse, DarajaError>>;
}

impl MpesaApi for DarajaClient {
    fn stk_push(
        &self,
        request: ExpressRequest,
    ) -> BoxFuture<'_, Result<StkPushResponse, DarajaError>> {
        Box::pin(Self::stk_push(self, request))
    }

    fn stk_push_query(
        &self,
        query: ExpressQuery,
    ) -> BoxFuture<'_, Result<StkQueryResponse, DarajaError>> {
        Box::pin(Self::stk_push_query(self, query))
    }

    fn b2c(&self, request: B2cRequest) -> BoxFuture<'_, Result<ApiResponse, DarajaError>> {
        Box::pin(Self::b2c(self, request))
    }

    fn balance_query(
        &self,
        query: BalanceQuery,
    ) -> BoxFuture<'_, Result<ApiResponse, DarajaError>> {
        Box::pin(Self::balance_query(self, query))
    }

    fn transaction_status(
        &self,
        query: TransactionStatusQuery,
    ) -> BoxFuture<'_, Result<ApiResponse, DarajaError>> {
        Box::pin(Self::transaction_status(self, query))
    }

    fn reverse(&self, request: ReversalRequest) -> BoxFuture<'_, Result<ApiResponse, DarajaError>> {
        Box::pin(Self::reverse(self, request))
    }

    fn register_urls(
        &self,
        request: RegisterUrls,
    ) -> BoxFuture<'_, Result<RegisterUrlResponse, DarajaError>> {
        Box::pin(Self::register_urls(self, request))
    }

    fn c2b_simulate(
        &self,
        request: C2bSimulate,
    ) -> BoxFuture<'_, Result<ApiResponse, DarajaError>> {
        Box::pin(Self::c2b_simulate(self, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daraja::ValidationError;

    /// Accepts every disbursement without touching the network.
    struct Recorder;

    impl MpesaApi for Recorder {
        fn stk_push(
            &self,
            _request: ExpressRequest,
        ) -> BoxFuture<'_, Result<StkPushResponse, DarajaError>> {
            Box::pin(async { Ok(StkPushResponse::default()) })
        }

        fn stk_push_query(
            &self,
            _query: ExpressQuery,
        ) -> BoxFuture<'_, Result<StkQueryResponse, DarajaError>> {
            Box::pin(async { Ok(StkQueryResponse::default()) })
        }

        fn b2c(&self, request: B2cRequest) -> BoxFuture<'_, Result<ApiResponse, DarajaError>> {
            Box::pin(async move {
                Ok(ApiResponse {
                    conversation_id: request.short_code,
                    ..ApiResponse::default()
                })
            })
        }

        fn balance_query(
            &self,
            _query: BalanceQuery,
        ) -> BoxFuture<'_, Result<ApiResponse, DarajaError>> {
            Box::pin(async { Err(ValidationError::MissingParty.into()) })
        }

        fn transaction_status(
            &self,
            _query: TransactionStatusQuery,
        ) -> BoxFuture<'_, Result<ApiResponse, DarajaError>> {
            Box::pin(async { Ok(ApiResponse::default()) })
        }

        fn reverse(
            &self,
            _request: ReversalRequest,
        ) -> BoxFuture<'_, Result<ApiResponse, DarajaError>> {
            Box::pin(async { Ok(ApiResponse::default()) })
        }

        fn register_urls(
            &self,
            _request: RegisterUrls,
        ) -> BoxFuture<'_, Result<RegisterUrlResponse, DarajaError>> {
            Box::pin(async { Ok(RegisterUrlResponse::default()) })
        }

        fn c2b_simulate(
            &self,
            _request: C2bSimulate,
        ) -> BoxFuture<'_, Result<ApiResponse, DarajaError>> {
            Box::pin(async { Ok(ApiResponse::default()) })
        }
    }

    async fn disburse(api: &dyn MpesaApi) -> Result<String, DarajaError> {
        let response = api
            .b2c(B2cRequest {
                short_code: "600981".into(),
                ..Default::default()
            })
            .await?;
        Ok(response.conversation_id)
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let api: Box<dyn MpesaApi> = Box::new(Recorder);
        assert_eq!(disburse(api.as_ref()).await.unwrap(), "600981");
        assert!(
            api.balance_query(BalanceQuery::default())
                .await
                .is_err()
        );
    }

    #[test]
    fn test_client_is_mpesa_api() {
        fn assert_api<T: MpesaApi>() {}
        assert_api::<DarajaClient>();
    }
}
