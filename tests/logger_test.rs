use qrender::logger::init_logger;

#[test]
fn test_verbose_enables_debug() {
    init_logger(true);
    assert_eq!(log::max_level(), log::LevelFilter::Debug);
    assert!(log::log_enabled!(log::Level::Debug));
}
