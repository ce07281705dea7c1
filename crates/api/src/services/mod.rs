//! Application services.

pub mod auth;
pub mod bootstrap;
pub mod checkout;
pub mod payment_provider;
pub mod reconciliation;

pub use auth::AuthService;
pub use checkout::{CheckoutError, CheckoutService};
pub use payment_provider::{
    HttpPaymentProvider, PaymentProvider, ProviderCharge, ProviderChargeStatus, ProviderError,
};
pub use reconciliation::{ReconcileError, ReconciliationService};
