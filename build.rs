fn main() {
    println!("cargo:rerun-if-env-changed=USELESSBOX_CONFIG");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
