//! Closed value sets accepted by the gateway, with the labels shown to payers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Returned when a wire value is not one of the enumerated choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChoice(pub String);

impl fmt::Display for UnknownChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown choice: {}", self.0)
    }
}

impl std::error::Error for UnknownChoice {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "RUR")]
    Rur,
    /// Sandbox currency, accepted only by the gateway's test mode.
    #[serde(rename = "TST")]
    Tst,
    #[serde(rename = "RUB")]
    Rub,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Rur, Currency::Tst, Currency::Rub];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Rur => "RUR",
            Currency::Tst => "TST",
            Currency::Rub => "RUB",
        }
    }

    /// Default offered on new requests: the test currency while in debug mode.
    pub fn default_for(debug: bool) -> Self {
        if debug { Currency::Tst } else { Currency::Rub }
    }

    pub fn choices() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|c| (c.as_str(), c.as_str())).collect()
    }
}

impl FromStr for Currency {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownChoice(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Inner,
    BankCard,
    Exchangers,
    Terminals,
    Transfers,
    Sms,
    Bank,
    Telemoney,
    RbkMoney,
    Yandex,
    MoneyMail,
    Walet,
    EasyPay,
    LiqPay,
    ZPayment,
    QiwiPurse,
    VkontakteBank,
    MailRu,
    AmegaEko,
    MobiMoney,
    Rapida,
    AlfaClick,
}

/// (method, wire value, label). Common methods first, then the exchangers.
static METHODS: [(PaymentMethod, &str, &str); 22] = [
    (PaymentMethod::Inner, "inner", "IntellectMoney"),
    (PaymentMethod::BankCard, "bankCard", "Visa/MasterCard"),
    (PaymentMethod::Exchangers, "exchangers", "Internet Exchangers"),
    (PaymentMethod::Terminals, "terminals", "Terminals"),
    (PaymentMethod::Transfers, "transfers", "Transfers"),
    (PaymentMethod::Sms, "sms", "SMS"),
    (PaymentMethod::Bank, "bank", "Bank"),
    (PaymentMethod::Telemoney, "telemoney", "Telemoney"),
    (PaymentMethod::RbkMoney, "rbkmoney", "RBKMoney"),
    (PaymentMethod::Yandex, "yandex", "Яндекс.деньги"),
    (PaymentMethod::MoneyMail, "moneymail", "MoneyMail"),
    (PaymentMethod::Walet, "walet", "Единый кошелек"),
    (PaymentMethod::EasyPay, "easypay", "EasyPay"),
    (PaymentMethod::LiqPay, "liqpay", "LiqPay"),
    (PaymentMethod::ZPayment, "zpayment", "Zpayment"),
    (PaymentMethod::QiwiPurse, "qiwipurse", "QIWI Кошелек"),
    (PaymentMethod::VkontakteBank, "vkontaktebank", "В Контакте"),
    (PaymentMethod::MailRu, "mailru", "Деньги@Mail.Ru"),
    (PaymentMethod::AmegaEko, "amegaeko", "Единая Кнопка Оплаты"),
    (PaymentMethod::MobiMoney, "mobimoney", "С баланса телефона"),
    (PaymentMethod::Rapida, "rapida", "В салонах связи"),
    (PaymentMethod::AlfaClick, "alfaclick", "AlfaClick"),
];

impl PaymentMethod {
    pub fn all() -> impl Iterator<Item = PaymentMethod> {
        METHODS.iter().map(|(method, _, _)| *method)
    }

    pub fn as_str(&self) -> &'static str {
        self.entry().1
    }

    pub fn label(&self) -> &'static str {
        self.entry().2
    }

    fn entry(&self) -> &'static (PaymentMethod, &'static str, &'static str) {
        // METHODS lists every variant exactly once.
        &METHODS[*self as usize]
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        METHODS
            .iter()
            .find(|(_, value, _)| *value == s)
            .map(|(method, _, _)| *method)
            .ok_or_else(|| UnknownChoice(s.to_string()))
    }
}

/// Payment methods offered to the payer: one method or a predefined group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Method(PaymentMethod),
    All,
    AllExceptInner,
}

impl Preference {
    pub const ALL_METHODS: &'static str = "inner,bankCard,exchangers,terminals,bank,transfers,sms";
    pub const ALL_EXCEPT_INNER: &'static str = "bankCard,exchangers,terminals,bank,transfers,sms";

    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::Method(method) => method.as_str(),
            Preference::All => Self::ALL_METHODS,
            Preference::AllExceptInner => Self::ALL_EXCEPT_INNER,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Preference::Method(method) => method.label(),
            Preference::All => "All",
            Preference::AllExceptInner => "All without inner",
        }
    }

    pub fn choices() -> Vec<(&'static str, &'static str)> {
        PaymentMethod::all()
            .map(Preference::Method)
            .chain([Preference::All, Preference::AllExceptInner])
            .map(|p| (p.as_str(), p.label()))
            .collect()
    }
}

impl FromStr for Preference {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ALL_METHODS => Ok(Preference::All),
            Self::ALL_EXCEPT_INNER => Ok(Preference::AllExceptInner),
            other => other.parse().map(Preference::Method),
        }
    }
}

/// Invoice state reported by the gateway in payment-result callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i64")]
pub enum PaymentStatus {
    Created = 3,
    Cancelled = 4,
    Paid = 5,
    Held = 6,
    PartiallyPaid = 7,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 5] = [
        PaymentStatus::Created,
        PaymentStatus::Cancelled,
        PaymentStatus::PartiallyPaid,
        PaymentStatus::Paid,
        PaymentStatus::Held,
    ];

    pub fn code(&self) -> i64 {
        *self as i64
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Created => "Создан счет к оплате (СКО) за покупку",
            PaymentStatus::Cancelled => "СКО аннулирован, деньги возвращены пользователю",
            PaymentStatus::Paid => "СКО полностью оплачен",
            PaymentStatus::Held => "Cумма заблокирована на СКО, ожидается запрос на списание",
            PaymentStatus::PartiallyPaid => "СКО частично оплачен",
        }
    }

    pub fn is_paid(&self) -> bool {
        *self == PaymentStatus::Paid
    }

    /// No further callbacks are expected for the invoice.
    pub fn is_final(&self) -> bool {
        matches!(self, PaymentStatus::Paid | PaymentStatus::Cancelled)
    }

    pub fn choices() -> Vec<(i64, &'static str)> {
        Self::ALL.iter().map(|s| (s.code(), s.label())).collect()
    }
}

impl TryFrom<i64> for PaymentStatus {
    type Error = UnknownChoice;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or_else(|| UnknownChoice(code.to_string()))
    }
}

impl From<PaymentStatus> for i64 {
    fn from(status: PaymentStatus) -> Self {
        status.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminActionKind {
    Refund,
    ToPaid,
}

impl AdminActionKind {
    pub const ALL: [AdminActionKind; 2] = [AdminActionKind::Refund, AdminActionKind::ToPaid];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminActionKind::Refund => "Refund",
            AdminActionKind::ToPaid => "ToPaid",
        }
    }
}

impl FromStr for AdminActionKind {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownChoice(s.to_string()))
    }
}
