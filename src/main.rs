//! baledt メインエントリーポイント

use baledt::error;
use baledt::App;

fn main() {
    // パニックハンドラの設定
    error::setup_panic_handler();

    let mut app = App::new();
    if let Err(err) = app.run() {
        error::handle_fatal_error(&err, "main");
    }
}
