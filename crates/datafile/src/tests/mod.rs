mod helpers;
mod record_tests;
