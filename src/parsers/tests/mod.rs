mod links_tests;
