pub mod currency;
pub mod invoices;
