fn main() {
 if let Err(e) = faxc_drv::run() {
 eprintln!("error: {}", e);
 std::process::exit(1);
 }
}
