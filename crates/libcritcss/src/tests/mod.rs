mod critical_selector_source_tests;
mod css_parse_error_tests;
mod css_parser_tests;
mod css_source_span_tests;
mod round_trip_tests;
mod scenario_tests;
mod utils;
mod walker_tests;
