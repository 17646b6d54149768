//! Investment funds and their deposits.

use crate::StoreError;
use meridian_types::{AccountId, Amount, AssetId, FundDepositId, FundId, Timestamp};
use serde::{Deserialize, Serialize};

/// One row of a fund's payment-rate table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRate {
    /// Deposit period this rate applies to.
    pub period_days: u32,
    /// Interest over the whole period, in hundredths of a percent.
    pub percent: u32,
}

/// An investment fund advancing once per maintenance interval.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    pub id: FundId,
    pub owner: AccountId,
    pub asset: AssetId,
    pub balance: Amount,
    pub enabled: bool,
    /// The fund stops taking deposits and winds down past this time.
    pub datetime_end: Timestamp,
    pub payment_rates: Vec<PaymentRate>,
}

impl Fund {
    /// The rate row for a deposit period, if the fund offers one.
    pub fn rate_for_period(&self, period_days: u32) -> Option<PaymentRate> {
        self.payment_rates
            .iter()
            .copied()
            .find(|r| r.period_days == period_days)
    }
}

/// A deposit held inside a fund.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundDeposit {
    pub id: FundDepositId,
    pub fund: FundId,
    pub owner: AccountId,
    pub amount: Amount,
    /// Interest over the period, in hundredths of a percent.
    pub percent: u32,
    pub period_days: u32,
    pub enabled: bool,
    pub datetime_end: Timestamp,
}

/// Fund and deposit records.
pub trait FundStore {
    /// All funds ordered by id.
    fn funds(&self) -> Result<Vec<Fund>, StoreError>;

    fn get_fund(&self, id: FundId) -> Result<Fund, StoreError>;

    fn put_fund(&self, fund: &Fund) -> Result<(), StoreError>;

    /// Deposits of one fund ordered by id.
    fn deposits_of_fund(&self, fund: FundId) -> Result<Vec<FundDeposit>, StoreError>;

    fn put_fund_deposit(&self, deposit: &FundDeposit) -> Result<(), StoreError>;
}
