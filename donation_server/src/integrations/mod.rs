pub mod event_hooks;
pub mod midtrans;
