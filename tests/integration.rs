//! Integration tests for wizard-runner
//!
//! These tests require Chrome to be installed and available.
//! Run with: cargo test --test integration -- --ignored

use wizard_runner::{PageDriver, Session};

/// Check if Chrome is available
fn chrome_available() -> bool {
    eoka::stealth::patcher::find_chrome().is_ok()
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_enumerate_language_select() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let session = Session::launch(true).await.expect("Failed to launch browser");
    session
        .goto(
            r##"data:text/html,
            <select name="langcode">
                <option value="en">English</option>
                <option value="de">German</option>
            </select>
        "##,
        )
        .await
        .expect("Failed to navigate");

    let options = session
        .query_options(r#"select[name="langcode"] option"#)
        .await
        .expect("Failed to enumerate options");
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].value, "en");
    assert_eq!(options[0].label, "English");

    session.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_enumerate_radio_items() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let session = Session::launch(true).await.expect("Failed to launch browser");
    session
        .goto(
            r##"data:text/html,
            <div class="js-form-type-radio">
                <input type="radio" name="profile" value="standard">
                <label>Standard</label>
                <div class="form-item__description">Install with common features.</div>
            </div>
        "##,
        )
        .await
        .expect("Failed to navigate");

    let options = session
        .query_options(".js-form-type-radio")
        .await
        .expect("Failed to enumerate options");
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].value, "standard");
    assert_eq!(options[0].label, "Standard");
    assert_eq!(
        options[0].description.as_deref(),
        Some("Install with common features.")
    );

    session.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_exists_and_fill() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let session = Session::launch(true).await.expect("Failed to launch browser");
    session
        .goto(r##"data:text/html,<input id="site-name" type="text">"##)
        .await
        .expect("Failed to navigate");

    assert!(session.exists("#site-name").await.expect("exists failed"));
    assert!(!session
        .exists(".messages--error")
        .await
        .expect("exists failed"));

    session
        .fill("#site-name", "Example Site")
        .await
        .expect("Failed to fill");

    session.close().await.expect("Failed to close browser");
}
