fn main() {
    // Host builds (unit tests of the fusion core) have no ESP-IDF environment
    // to forward.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
