use super::CancellationToken;

#[test]
fn fresh_token_is_not_cancelled() {
    let token = CancellationToken::new();
    assert!(token.check().is_ok());
}

#[test]
fn cancel_trips_every_clone() {
    let token = CancellationToken::new();
    let clone = token.clone();
    clone.cancel();
    assert!(token.check().is_err());
}
