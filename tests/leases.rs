use cadastre::{
    lease::DAYS_PER_MONTH,
    time::{ManualClock, Timestamp},
    transfer::InMemoryBank,
    AccountId, Error, Event, Ledger, LeaseId, PropertyId,
};
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

fn start() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn setup() -> (Ledger, Arc<InMemoryBank>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start()));
    let bank = Arc::new(InMemoryBank::new());
    let ledger = Ledger::new(AccountId::new(), clock.clone(), bank.clone());
    (ledger, bank, clock)
}

/// Landlord with one registered, unlisted property and a lease on it.
fn lease_fixture(
    ledger: &mut Ledger,
    rent: u64,
    deposit: u64,
    months: u32,
) -> (AccountId, AccountId, PropertyId, LeaseId) {
    let landlord = AccountId::new();
    let tenant = AccountId::new();
    let property_id = ledger.register_property(landlord, "12 Oak Ave", 5000);
    let lease_id = ledger
        .create_lease(landlord, property_id, tenant, rent, deposit, months)
        .unwrap();
    (landlord, tenant, property_id, lease_id)
}

#[test]
fn twelve_month_lease_scenario() {
    let (mut ledger, bank, clock) = setup();
    let (landlord, tenant, _property_id, lease_id) = lease_fixture(&mut ledger, 10, 20, 12);

    ledger.pay_deposit(tenant, lease_id, 20).unwrap();
    assert_eq!(ledger.escrow_balance(), 20);

    for _ in 0..3 {
        clock.advance(Duration::days(30));
        ledger.pay_rent(tenant, lease_id, 10).unwrap();
    }

    let lease = ledger.lease(lease_id).unwrap();
    assert_eq!(lease.last_payment, Some(start() + Duration::days(90)));
    assert_eq!(bank.balance(landlord), 30);

    ledger.terminate_lease(landlord, lease_id).unwrap();
    ledger.return_deposit(landlord, lease_id).unwrap();

    let lease = ledger.lease(lease_id).unwrap();
    assert!(!lease.active);
    assert!(lease.deposit_returned);
    assert_eq!(bank.balance(tenant), 20);
    assert_eq!(ledger.escrow_balance(), 0);
}

#[test]
fn lease_term_uses_thirty_day_months() {
    let (mut ledger, _bank, _clock) = setup();
    let (_, _, _, lease_id) = lease_fixture(&mut ledger, 10, 20, 12);

    let lease = ledger.lease(lease_id).unwrap();
    assert_eq!(lease.lease_start, start());
    assert_eq!(
        lease.lease_end,
        start() + Duration::days(DAYS_PER_MONTH * 12)
    );
}

#[test]
fn lease_creation_emits_event_and_indexes_tenant() {
    let (mut ledger, _bank, _clock) = setup();
    let (_, tenant, property_id, lease_id) = lease_fixture(&mut ledger, 10, 20, 12);

    assert_eq!(ledger.leases_by_tenant(tenant), [lease_id]);
    assert!(ledger.events().contains(&Event::LeaseCreated {
        id: lease_id,
        property_id,
        tenant,
        monthly_rent: 10,
    }));
}

#[test]
fn cannot_lease_a_property_listed_for_sale() {
    let (mut ledger, _bank, _clock) = setup();
    let landlord = AccountId::new();
    let tenant = AccountId::new();
    let property_id = ledger.register_property(landlord, "12 Oak Ave", 5000);
    ledger.list_for_sale(landlord, property_id, 5000).unwrap();

    let err = ledger
        .create_lease(landlord, property_id, tenant, 10, 20, 12)
        .unwrap_err();

    assert!(matches!(err, Error::InvalidState(_)));
}

#[test]
fn lease_creation_rejects_bad_arguments() {
    let (mut ledger, _bank, _clock) = setup();
    let landlord = AccountId::new();
    let tenant = AccountId::new();
    let stranger = AccountId::new();
    let property_id = ledger.register_property(landlord, "12 Oak Ave", 5000);

    let err = ledger
        .create_lease(landlord, property_id, AccountId::ZERO, 10, 20, 12)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = ledger
        .create_lease(landlord, property_id, tenant, 0, 20, 12)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = ledger
        .create_lease(landlord, property_id, tenant, 10, 20, 0)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = ledger
        .create_lease(stranger, property_id, tenant, 10, 20, 12)
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }));

    let err = ledger
        .create_lease(landlord, PropertyId(99), tenant, 10, 20, 12)
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn lease_duration_beyond_representable_time_is_rejected() {
    let (mut ledger, _bank, _clock) = setup();
    let landlord = AccountId::new();
    let tenant = AccountId::new();
    let property_id = ledger.register_property(landlord, "12 Oak Ave", 5000);

    let before = ledger.state().checkpoint().unwrap();
    let err = ledger
        .create_lease(landlord, property_id, tenant, 10, 20, u32::MAX)
        .unwrap_err();

    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(before, ledger.state().checkpoint().unwrap());
    assert!(ledger.leases_by_tenant(tenant).is_empty());
}

#[test]
fn only_the_tenant_may_pay_rent() {
    let (mut ledger, bank, _clock) = setup();
    let (landlord, _tenant, _, lease_id) = lease_fixture(&mut ledger, 10, 20, 12);
    let stranger = AccountId::new();

    let err = ledger.pay_rent(stranger, lease_id, 10).unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }));

    let err = ledger.pay_rent(landlord, lease_id, 10).unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }));

    assert_eq!(bank.balance(landlord), 0);
    assert_eq!(ledger.lease(lease_id).unwrap().last_payment, None);
}

#[test]
fn rent_must_match_the_agreed_amount() {
    let (mut ledger, bank, _clock) = setup();
    let (landlord, tenant, _, lease_id) = lease_fixture(&mut ledger, 10, 20, 12);

    let err = ledger.pay_rent(tenant, lease_id, 9).unwrap_err();
    assert!(matches!(
        err,
        Error::InsufficientFunds {
            needed: 10,
            available: 9,
        }
    ));

    let err = ledger.pay_rent(tenant, lease_id, 11).unwrap_err();
    assert!(matches!(err, Error::InsufficientFunds { .. }));

    assert_eq!(bank.balance(landlord), 0);
}

#[test]
fn rent_is_rejected_after_the_lease_term() {
    let (mut ledger, _bank, clock) = setup();
    let (_, tenant, _, lease_id) = lease_fixture(&mut ledger, 10, 20, 1);

    clock.advance(Duration::days(31));
    let err = ledger.pay_rent(tenant, lease_id, 10).unwrap_err();

    assert!(matches!(err, Error::InvalidState(_)));
}

#[test]
fn rent_is_rejected_on_a_terminated_lease() {
    let (mut ledger, _bank, _clock) = setup();
    let (landlord, tenant, _, lease_id) = lease_fixture(&mut ledger, 10, 20, 12);
    ledger.terminate_lease(landlord, lease_id).unwrap();

    let err = ledger.pay_rent(tenant, lease_id, 10).unwrap_err();

    assert!(matches!(err, Error::InvalidState(_)));
}

#[test]
fn failed_landlord_credit_rolls_back_rent_payment() {
    let (mut ledger, bank, _clock) = setup();
    let (landlord, tenant, _, lease_id) = lease_fixture(&mut ledger, 10, 20, 12);
    bank.reject_credits_to(landlord);

    let before = ledger.state().checkpoint().unwrap();
    let err = ledger.pay_rent(tenant, lease_id, 10).unwrap_err();

    assert!(matches!(err, Error::Transfer { .. }));
    assert_eq!(before, ledger.state().checkpoint().unwrap());
    assert_eq!(ledger.lease(lease_id).unwrap().last_payment, None);
}

#[test]
fn either_party_may_terminate() {
    let (mut ledger, _bank, _clock) = setup();

    let (_, tenant, _, by_tenant) = lease_fixture(&mut ledger, 10, 20, 12);
    ledger.terminate_lease(tenant, by_tenant).unwrap();
    assert!(!ledger.lease(by_tenant).unwrap().active);

    let (landlord, _, _, by_landlord) = lease_fixture(&mut ledger, 10, 20, 12);
    ledger.terminate_lease(landlord, by_landlord).unwrap();
    assert!(!ledger.lease(by_landlord).unwrap().active);
}

#[test]
fn strangers_may_not_terminate_and_termination_is_single_shot() {
    let (mut ledger, _bank, _clock) = setup();
    let (landlord, _, _, lease_id) = lease_fixture(&mut ledger, 10, 20, 12);
    let stranger = AccountId::new();

    let err = ledger.terminate_lease(stranger, lease_id).unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }));

    ledger.terminate_lease(landlord, lease_id).unwrap();
    let err = ledger.terminate_lease(landlord, lease_id).unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));
}

#[test]
fn unknown_lease_is_not_found() {
    let (mut ledger, _bank, _clock) = setup();
    let caller = AccountId::new();
    let missing = LeaseId(7);

    assert!(matches!(
        ledger.lease(missing).unwrap_err(),
        Error::NotFound { .. }
    ));
    assert!(matches!(
        ledger.pay_rent(caller, missing, 10).unwrap_err(),
        Error::NotFound { .. }
    ));
    assert!(matches!(
        ledger.terminate_lease(caller, missing).unwrap_err(),
        Error::NotFound { .. }
    ));
    assert!(matches!(
        ledger.return_deposit(caller, missing).unwrap_err(),
        Error::NotFound { .. }
    ));
}

#[test]
fn terminated_lease_remains_a_historical_record() {
    let (mut ledger, _bank, _clock) = setup();
    let (landlord, tenant, property_id, lease_id) = lease_fixture(&mut ledger, 10, 20, 12);
    ledger.terminate_lease(landlord, lease_id).unwrap();

    let lease = ledger.lease(lease_id).unwrap();
    assert_eq!(lease.property_id, property_id);
    assert_eq!(lease.tenant, tenant);
    assert_eq!(ledger.leases_by_tenant(tenant), [lease_id]);
}
