mod calendar;
mod common;
mod service;
