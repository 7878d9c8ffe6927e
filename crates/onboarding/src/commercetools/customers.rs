//! Customer sign-up and email verification.

use tracing::instrument;

use sellertools_core::CustomerId;

use super::{
    CommercetoolsClient, CommercetoolsError, Customer, CustomerCreateEmailToken, CustomerDraft,
    CustomerEmailVerify, CustomerSignInResult, CustomerToken,
};

impl CommercetoolsClient {
    /// Create a customer (sign-up).
    ///
    /// # Errors
    ///
    /// Returns `CommercetoolsError::Duplicate` if the email is already
    /// registered in the project.
    #[instrument(skip(self, draft), fields(email = %draft.email))]
    pub async fn create_customer(
        &self,
        draft: &CustomerDraft,
    ) -> Result<Customer, CommercetoolsError> {
        let result: CustomerSignInResult = self.post("/customers", draft).await?;
        tracing::info!(customer_id = %result.customer.id, "Created customer");
        Ok(result.customer)
    }

    /// Create an email verification token for a customer.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn create_email_token(
        &self,
        customer_id: &CustomerId,
        ttl_minutes: u32,
    ) -> Result<CustomerToken, CommercetoolsError> {
        let body = CustomerCreateEmailToken {
            id: customer_id.clone(),
            ttl_minutes,
        };
        self.post("/customers/email-token", &body).await
    }

    /// Confirm a customer's email with a verification token value.
    ///
    /// # Errors
    ///
    /// Returns error if the token is unknown, expired, or the request fails.
    #[instrument(skip(self, token_value))]
    pub async fn confirm_email(&self, token_value: &str) -> Result<Customer, CommercetoolsError> {
        let body = CustomerEmailVerify {
            token_value: token_value.to_string(),
        };
        self.post("/customers/email/confirm", &body).await
    }
}
