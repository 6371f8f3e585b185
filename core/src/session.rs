/// Session state machine: account, form, cached transfers and the loading flag.
///
/// Purely synchronous. Callers perform the wallet/contract calls between the
/// `begin_*` and `finish_*` transitions (see `TransactionWorkflow` and the GUI).
use std::str::FromStr;

use alloy_primitives::Address;

use crate::display;
use crate::error::{DappError, Result};
use crate::network::{SubmitReceipt, TransferRecord, TransferRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No account known.
    Idle,
    /// Startup query of already-authorized accounts.
    Checking,
    /// Waiting on the wallet's authorization prompt.
    Connecting,
    Ready,
    Submitting,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Checking => write!(f, "checking"),
            Self::Connecting => write!(f, "connecting"),
            Self::Ready => write!(f, "ready"),
            Self::Submitting => write!(f, "submitting"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    AddressTo,
    Amount,
    Keyword,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::AddressTo,
        FormField::Amount,
        FormField::Keyword,
        FormField::Message,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::AddressTo => "addressTo",
            Self::Amount => "amount",
            Self::Keyword => "keyword",
            Self::Message => "message",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "addressto" | "address_to" | "to" | "address" => Ok(Self::AddressTo),
            "amount" => Ok(Self::Amount),
            "keyword" | "kw" => Ok(Self::Keyword),
            "message" | "msg" => Ok(Self::Message),
            other => Err(format!(
                "Unknown field '{other}'. Fields: addressTo, amount, keyword, message."
            )),
        }
    }
}

/// The four free-text inputs of a transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub address_to: String,
    pub amount: String,
    pub keyword: String,
    pub message: String,
}

impl TransferForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::AddressTo => &self.address_to,
            FormField::Amount => &self.amount,
            FormField::Keyword => &self.keyword,
            FormField::Message => &self.message,
        }
    }

    fn slot(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::AddressTo => &mut self.address_to,
            FormField::Amount => &mut self.amount,
            FormField::Keyword => &mut self.keyword,
            FormField::Message => &mut self.message,
        }
    }

    /// Recipient and amount are filled in.
    pub fn is_complete(&self) -> bool {
        !self.address_to.trim().is_empty() && !self.amount.trim().is_empty()
    }

    /// Check the form locally before anything reaches the wallet.
    pub fn validate(&self) -> Result<TransferRequest> {
        let to_str = self.address_to.trim();
        if to_str.is_empty() {
            return Err(DappError::InvalidRecipient(
                "Recipient address is required.".into(),
            ));
        }
        let to = Address::from_str(to_str)
            .map_err(|_| DappError::InvalidRecipient(format!("Invalid recipient address '{to_str}'")))?;
        if to == Address::ZERO {
            return Err(DappError::InvalidRecipient(
                "Refusing to send to the zero address.".into(),
            ));
        }

        let amount_wei = display::parse_ether_amount(&self.amount).map_err(DappError::InvalidAmount)?;
        if amount_wei.is_zero() {
            return Err(DappError::InvalidAmount("Cannot send 0 ETH.".into()));
        }

        Ok(TransferRequest {
            to,
            amount_wei,
            keyword: self.keyword.trim().to_string(),
            message: self.message.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    account: Option<Address>,
    form: TransferForm,
    transactions: Vec<TransferRecord>,
    transaction_count: Option<u64>,
    loading: bool,
    /// Phase to fall back to if a connect attempt fails.
    before_connect: Phase,
}

impl Session {
    /// `stored_count` is the counter last persisted in local storage, if any.
    pub fn new(stored_count: Option<u64>) -> Self {
        Self {
            phase: Phase::Idle,
            account: None,
            form: TransferForm::default(),
            transactions: Vec::new(),
            transaction_count: stored_count,
            loading: false,
            before_connect: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn account(&self) -> Option<&Address> {
        self.account.as_ref()
    }

    pub fn form(&self) -> &TransferForm {
        &self.form
    }

    pub fn transactions(&self) -> &[TransferRecord] {
        &self.transactions
    }

    pub fn transaction_count(&self) -> Option<u64> {
        self.transaction_count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the view should offer the submit action.
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Ready && !self.loading && self.form.is_complete()
    }

    pub fn begin_check(&mut self) -> Result<()> {
        if self.phase != Phase::Idle {
            return Err(DappError::InvalidState(format!(
                "Cannot check the wallet while {}",
                self.phase
            )));
        }
        self.phase = Phase::Checking;
        Ok(())
    }

    /// Apply the result of `eth_accounts`. Returns the account if one was authorized.
    pub fn finish_check(&mut self, accounts: &[Address]) -> Option<Address> {
        if self.phase != Phase::Checking {
            return self.account;
        }
        match accounts.first() {
            Some(account) => {
                self.account = Some(*account);
                self.phase = Phase::Ready;
            }
            None => self.phase = Phase::Idle,
        }
        self.account
    }

    pub fn begin_connect(&mut self) -> Result<()> {
        match self.phase {
            Phase::Idle | Phase::Ready => {
                self.before_connect = self.phase;
                self.phase = Phase::Connecting;
                Ok(())
            }
            other => Err(DappError::InvalidState(format!(
                "Cannot connect while {other}"
            ))),
        }
    }

    /// Apply the result of `eth_requestAccounts`. On failure the previous
    /// phase and account are kept, so the shown account never drifts from the wallet.
    pub fn finish_connect(&mut self, result: Result<Vec<Address>>) -> Result<Address> {
        if self.phase != Phase::Connecting {
            return Err(DappError::InvalidState("No connect in progress".into()));
        }
        match result {
            Ok(accounts) => match accounts.first() {
                Some(account) => {
                    self.account = Some(*account);
                    self.phase = Phase::Ready;
                    Ok(*account)
                }
                None => {
                    self.phase = self.before_connect;
                    Err(DappError::NotConnected)
                }
            },
            Err(e) => {
                self.phase = self.before_connect;
                Err(e)
            }
        }
    }

    /// Overwrite exactly one form field.
    pub fn handle_change(&mut self, field: FormField, value: impl Into<String>) {
        *self.form.slot(field) = value.into();
    }

    pub fn clear_form(&mut self) {
        self.form = TransferForm::default();
    }

    /// Validate the form and enter `Submitting`. Rejects a second submission in flight.
    pub fn begin_submit(&mut self) -> Result<(Address, TransferRequest)> {
        if self.phase == Phase::Submitting {
            return Err(DappError::InvalidState(
                "A transfer is already in flight.".into(),
            ));
        }
        let account = self.account.ok_or(DappError::NotConnected)?;
        if self.phase != Phase::Ready {
            return Err(DappError::InvalidState(format!(
                "Cannot submit while {}",
                self.phase
            )));
        }
        let request = self.form.validate()?;
        self.phase = Phase::Submitting;
        Ok((account, request))
    }

    /// The native transfer has been broadcast; the spinner turns on.
    pub fn native_submitted(&mut self) {
        if self.phase == Phase::Submitting {
            self.loading = true;
        }
    }

    /// Leave `Submitting`. On success the counter is updated and the form cleared.
    pub fn finish_submit(&mut self, result: &Result<SubmitReceipt>) {
        self.loading = false;
        if self.phase == Phase::Submitting {
            self.phase = Phase::Ready;
        }
        if let Ok(receipt) = result {
            self.transaction_count = Some(receipt.transaction_count);
            self.form = TransferForm::default();
        }
    }

    /// Replace the cached list wholesale.
    pub fn replace_transactions(&mut self, records: Vec<TransferRecord>) {
        self.transactions = records;
    }

    pub fn set_transaction_count(&mut self, count: u64) {
        self.transaction_count = Some(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, B256, U256};

    const ALICE: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const BOB: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

    fn ready_session() -> Session {
        let mut s = Session::new(None);
        s.begin_check().unwrap();
        s.finish_check(&[ALICE]);
        s
    }

    fn fill(s: &mut Session, to: &str, amount: &str) {
        s.handle_change(FormField::AddressTo, to);
        s.handle_change(FormField::Amount, amount);
        s.handle_change(FormField::Keyword, "coffee");
        s.handle_change(FormField::Message, "thanks");
    }

    #[test]
    fn check_with_accounts_is_ready() {
        let s = ready_session();
        assert_eq!(s.phase(), Phase::Ready);
        assert_eq!(s.account(), Some(&ALICE));
    }

    #[test]
    fn check_without_accounts_stays_idle() {
        let mut s = Session::new(Some(3));
        s.begin_check().unwrap();
        assert_eq!(s.finish_check(&[]), None);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.transaction_count(), Some(3));
    }

    #[test]
    fn connect_takes_first_account() {
        let mut s = Session::new(None);
        s.begin_connect().unwrap();
        assert_eq!(s.phase(), Phase::Connecting);
        assert_eq!(s.finish_connect(Ok(vec![BOB, ALICE])).unwrap(), BOB);
        assert_eq!(s.account(), Some(&BOB));
        assert_eq!(s.phase(), Phase::Ready);
    }

    #[test]
    fn rejected_connect_keeps_previous_state() {
        let mut s = Session::new(None);
        s.begin_connect().unwrap();
        assert!(matches!(
            s.finish_connect(Err(DappError::UserRejected)),
            Err(DappError::UserRejected)
        ));
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.account(), None);

        let mut s = ready_session();
        s.begin_connect().unwrap();
        assert!(s.finish_connect(Err(DappError::UserRejected)).is_err());
        assert_eq!(s.phase(), Phase::Ready);
        assert_eq!(s.account(), Some(&ALICE));
    }

    #[test]
    fn empty_authorization_is_not_connected() {
        let mut s = Session::new(None);
        s.begin_connect().unwrap();
        assert!(matches!(
            s.finish_connect(Ok(vec![])),
            Err(DappError::NotConnected)
        ));
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn handle_change_touches_one_field() {
        for field in FormField::ALL {
            let mut s = Session::new(None);
            fill(&mut s, "0xabc", "1");
            let before = s.form().clone();
            s.handle_change(field, "changed");
            for other in FormField::ALL {
                if other == field {
                    assert_eq!(s.form().get(other), "changed");
                } else {
                    assert_eq!(s.form().get(other), before.get(other), "{other} changed");
                }
            }
        }
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("addressTo".parse::<FormField>().unwrap(), FormField::AddressTo);
        assert_eq!("to".parse::<FormField>().unwrap(), FormField::AddressTo);
        assert_eq!("AMOUNT".parse::<FormField>().unwrap(), FormField::Amount);
        assert_eq!("msg".parse::<FormField>().unwrap(), FormField::Message);
        assert!("gas".parse::<FormField>().is_err());
        for field in FormField::ALL {
            assert_eq!(field.name().parse::<FormField>().unwrap(), field);
        }
    }

    #[test]
    fn empty_recipient_fails_validation() {
        let mut s = ready_session();
        fill(&mut s, "", "1");
        assert!(matches!(
            s.begin_submit(),
            Err(DappError::InvalidRecipient(_))
        ));
        assert_eq!(s.phase(), Phase::Ready);
    }

    #[test]
    fn bad_recipient_and_amount_fail_validation() {
        let mut s = ready_session();
        fill(&mut s, "0x1234", "1");
        assert!(matches!(s.begin_submit(), Err(DappError::InvalidRecipient(_))));

        fill(&mut s, &Address::ZERO.to_string(), "1");
        assert!(matches!(s.begin_submit(), Err(DappError::InvalidRecipient(_))));

        fill(&mut s, &BOB.to_string(), "1,5");
        assert!(matches!(s.begin_submit(), Err(DappError::InvalidAmount(_))));

        fill(&mut s, &BOB.to_string(), "0");
        assert!(matches!(s.begin_submit(), Err(DappError::InvalidAmount(_))));
    }

    #[test]
    fn submit_requires_account() {
        let mut s = Session::new(None);
        fill(&mut s, &BOB.to_string(), "1");
        assert!(matches!(s.begin_submit(), Err(DappError::NotConnected)));
    }

    #[test]
    fn second_submit_is_rejected() {
        let mut s = ready_session();
        fill(&mut s, &BOB.to_string(), "1.5");
        let (from, req) = s.begin_submit().unwrap();
        assert_eq!(from, ALICE);
        assert_eq!(req.to, BOB);
        assert_eq!(req.amount_wei, U256::from(1_500_000_000_000_000_000u128));
        assert!(matches!(s.begin_submit(), Err(DappError::InvalidState(_))));
    }

    #[test]
    fn loading_spans_native_to_finish() {
        let mut s = ready_session();
        fill(&mut s, &BOB.to_string(), "1");
        s.begin_submit().unwrap();
        assert!(!s.is_loading());
        s.native_submitted();
        assert!(s.is_loading());
        assert!(!s.can_submit());

        let receipt = SubmitReceipt {
            native_tx: B256::repeat_byte(1),
            record_tx: B256::repeat_byte(2),
            transaction_count: 9,
        };
        s.finish_submit(&Ok(receipt));
        assert!(!s.is_loading());
        assert_eq!(s.phase(), Phase::Ready);
        assert_eq!(s.transaction_count(), Some(9));
        assert_eq!(s.form(), &TransferForm::default());
    }

    #[test]
    fn failed_submit_clears_loading_and_keeps_form() {
        let mut s = ready_session();
        fill(&mut s, &BOB.to_string(), "1");
        s.begin_submit().unwrap();
        s.native_submitted();
        s.finish_submit(&Err(DappError::UserRejected));
        assert!(!s.is_loading());
        assert_eq!(s.phase(), Phase::Ready);
        assert_eq!(s.form().amount, "1");
    }

    #[test]
    fn replace_transactions_is_wholesale() {
        let mut s = ready_session();
        let record = TransferRecord {
            sender: ALICE,
            receiver: BOB,
            timestamp: String::new(),
            timestamp_secs: 0,
            message: String::new(),
            keyword: String::new(),
            amount: "1".into(),
            amount_wei: U256::from(1),
        };
        s.replace_transactions(vec![record.clone(), record.clone()]);
        s.replace_transactions(vec![record]);
        assert_eq!(s.transactions().len(), 1);
    }
}
