mod css_token_kind_tests;
