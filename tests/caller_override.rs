mod common;

use std::panic::{catch_unwind, AssertUnwindSafe};

use common::{deploy, key, observed_caller};
use ledgersim::{CoinPublicKey, IdentityState, Value};

#[test]
fn single_use_caller_applies_to_one_impure_call() {
    let alice = key("alice");
    let mut sim = deploy();

    sim.as_caller(alice).impure("increment", &[]).unwrap();
    assert_eq!(sim.public_state().last_caller, Some(alice));

    sim.impure("increment", &[]).unwrap();
    assert_eq!(sim.public_state().last_caller, Some(CoinPublicKey::zero()));
}

#[test]
fn single_use_caller_falls_back_to_persistent() {
    let alice = key("alice");
    let bob = key("bob");
    let mut sim = deploy();
    sim.set_persistent_caller(Some(bob));

    sim.as_caller(alice).impure("increment", &[]).unwrap();
    assert_eq!(sim.public_state().last_caller, Some(alice));

    sim.impure("increment", &[]).unwrap();
    assert_eq!(sim.public_state().last_caller, Some(bob));
}

#[test]
fn persistent_caller_holds_until_reset() {
    let bob = key("bob");
    let mut sim = deploy();
    sim.set_persistent_caller(Some(bob));

    sim.impure("increment", &[]).unwrap();
    assert_eq!(sim.public_state().last_caller, Some(bob));
    sim.impure("increment", &[]).unwrap();
    assert_eq!(sim.public_state().last_caller, Some(bob));

    sim.reset_caller();
    sim.impure("increment", &[]).unwrap();
    assert_eq!(sim.public_state().last_caller, Some(CoinPublicKey::zero()));
}

#[test]
fn clearing_persistent_caller_restores_default() {
    let mut sim = deploy();
    sim.set_persistent_caller(Some(key("bob")));
    sim.set_persistent_caller(None);

    assert_eq!(observed_caller(&mut sim), CoinPublicKey::zero());
}

#[test]
fn reset_drops_pending_single_use_caller() {
    let mut sim = deploy();
    sim.as_caller(key("alice"));
    sim.reset_caller();

    assert_eq!(observed_caller(&mut sim), CoinPublicKey::zero());
}

/// A pure read spends the single-use caller just like an impure call does.
///
/// This is kept on purpose: `as_caller` targets "the next invocation", whatever its
/// kind. Changing it must be a deliberate decision that updates this test.
#[test]
fn pure_call_consumes_single_use_caller() {
    let alice = key("alice");
    let mut sim = deploy();

    sim.as_caller(alice);
    assert_eq!(observed_caller(&mut sim), alice);

    sim.impure("increment", &[]).unwrap();
    assert_eq!(sim.public_state().last_caller, Some(CoinPublicKey::zero()));
}

#[test]
fn failed_call_consumes_single_use_caller() {
    let alice = key("alice");
    let mut sim = deploy();

    sim.as_caller(alice).impure("withdraw", &[Value::Uint(1)]).unwrap_err();
    assert_eq!(sim.caller_overrides().single_use(), None);
    assert_eq!(observed_caller(&mut sim), CoinPublicKey::zero());
}

#[test]
fn override_caller_gets_fresh_identity_state() {
    let alice = key("alice");
    let mut sim = deploy();
    sim.set_persistent_caller(Some(alice));

    assert_eq!(sim.caller_context(), IdentityState::new(alice));
}

#[test]
fn caller_context_reflects_priority_without_consuming() {
    let alice = key("alice");
    let bob = key("bob");
    let mut sim = deploy();

    assert_eq!(sim.caller_context().coin_public_key, CoinPublicKey::zero());

    sim.set_persistent_caller(Some(bob));
    assert_eq!(sim.caller_context().coin_public_key, bob);

    sim.as_caller(alice);
    assert_eq!(sim.caller_context().coin_public_key, alice);
    assert_eq!(sim.caller_context().coin_public_key, alice);
    assert_eq!(sim.caller_overrides().single_use(), Some(&alice));
}

#[test]
fn override_does_not_rewrite_stored_identity() {
    let mut sim = deploy();
    let stored = sim.context().identity.clone();

    sim.as_caller(key("alice")).impure("increment", &[]).unwrap();
    sim.set_persistent_caller(Some(key("bob")));
    sim.impure("deposit", &[Value::Uint(4)]).unwrap();

    assert_eq!(sim.context().identity, stored);
}

#[test]
fn balances_are_keyed_by_effective_caller() {
    let alice = key("alice");
    let bob = key("bob");
    let mut sim = deploy();

    sim.as_caller(alice).impure("deposit", &[Value::Uint(10)]).unwrap();
    sim.as_caller(bob).impure("deposit", &[Value::Uint(3)]).unwrap();
    sim.as_caller(bob).impure("withdraw", &[Value::Uint(2)]).unwrap();

    assert_eq!(sim.pure("balance_of", &[Value::Key(alice)]).unwrap(), Value::Uint(10));
    assert_eq!(sim.pure("balance_of", &[Value::Key(bob)]).unwrap(), Value::Uint(1));
    assert_eq!(sim.public_state().total_balance, 11);
}

#[test]
fn panicking_witness_consumes_single_use_caller_and_commits_nothing() {
    let mut sim = deploy();
    sim.impure("increment", &[]).unwrap();
    sim.override_witness("secret_value", |_, _| panic!("oracle exploded"))
        .unwrap();
    let before = sim.context().clone();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        sim.as_caller(key("alice")).impure("reveal_secret", &[])
    }));

    assert!(outcome.is_err());
    assert_eq!(sim.caller_overrides().single_use(), None);
    assert_eq!(sim.context(), &before);
    assert_eq!(observed_caller(&mut sim), CoinPublicKey::zero());
    assert_eq!(sim.public_state().counter, 1);
}
