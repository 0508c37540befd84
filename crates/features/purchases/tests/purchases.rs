use chub_catalog::InMemoryCatalog;
use chub_domain::course::Course;
use chub_domain::identity::{Principal, Role};
use chub_domain::outcome::ErrorKind;
use chub_domain::records::{LedgerKey, RecordKind};
use chub_kernel::clock::SystemClock;
use chub_ledger::{Ledger, LedgerError, MemoryStore, PersistenceStore, StoredEntry};
use chub_purchases::rules::purchase_chain;
use chub_purchases::*;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Approves charges until told otherwise and remembers every attempt.
#[derive(Debug, Default)]
struct ScriptedGateway {
    decline: Mutex<bool>,
    charges: Mutex<Vec<(String, String)>>,
}

impl ScriptedGateway {
    fn declining() -> Self {
        Self { decline: Mutex::new(true), ..Self::default() }
    }

    fn charges(&self) -> usize {
        self.charges.lock().len()
    }
}

impl PaymentGateway for ScriptedGateway {
    fn charge(&self, principal: &str, course: &Course) -> Result<PaymentReceipt, PaymentDecline> {
        let mut charges = self.charges.lock();
        charges.push((principal.to_owned(), course.id.clone()));
        if *self.decline.lock() {
            Err(PaymentDecline::Declined { message: "card refused".into(), context: None })
        } else {
            Ok(PaymentReceipt::new(format!("pay-{}", charges.len())))
        }
    }
}

fn purchases(gateway: Arc<ScriptedGateway>) -> Purchases {
    let catalog = InMemoryCatalog::from_courses([Course::new("course-101", "Rust")
        .with_materials(["syllabus.pdf"])
        .with_assessments(["Final exam"])]);
    init(Ledger::in_memory(), Arc::new(catalog), gateway, Arc::new(SystemClock))
}

/// Memory store whose audit partition can be made unwritable.
#[derive(Debug, Default)]
struct AuditFailingStore {
    inner: MemoryStore,
    fail_audit: AtomicBool,
}

impl PersistenceStore for AuditFailingStore {
    fn get(&self, key: &LedgerKey) -> Result<Option<StoredEntry>, LedgerError> {
        self.inner.get(key)
    }

    fn put(&self, key: LedgerKey, entry: StoredEntry) -> Result<(), LedgerError> {
        if key.kind == RecordKind::Transaction && self.fail_audit.load(Ordering::SeqCst) {
            return Err(LedgerError::Store {
                message: "audit partition offline".into(),
                context: None,
            });
        }
        self.inner.put(key, entry)
    }

    fn delete(&self, key: &LedgerKey) -> Result<Option<StoredEntry>, LedgerError> {
        self.inner.delete(key)
    }

    fn list(&self, kind: RecordKind) -> Result<Vec<StoredEntry>, LedgerError> {
        self.inner.list(kind)
    }
}

fn purchases_over(store: Arc<AuditFailingStore>) -> (Purchases, Ledger) {
    let catalog = InMemoryCatalog::from_courses([Course::new("course-101", "Rust")]);
    let ledger = Ledger::builder().store(store).open().unwrap();
    let purchases = init(
        ledger.clone(),
        Arc::new(catalog),
        Arc::new(ScriptedGateway::default()),
        Arc::new(SystemClock),
    );
    (purchases, ledger)
}

fn student() -> Principal {
    Principal::authenticated("student@example.com", Role::Student)
}

#[test]
fn successful_purchase_is_recorded_with_audit_entry() {
    let gateway = Arc::new(ScriptedGateway::default());
    let purchases = purchases(gateway.clone());

    let record = purchases.purchase(&student(), "course-101").unwrap();

    assert!(record.is_active());
    assert_eq!(record.payment_reference, "pay-1");
    assert!(purchases.has_active_purchase("student@example.com", "course-101").unwrap());

    let trail = purchases.transactions(&student()).unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].course, "course-101");
    assert_eq!(trail[0].payment_reference, "pay-1");
}

#[test]
fn second_purchase_is_refused_before_charging() {
    let gateway = Arc::new(ScriptedGateway::default());
    let purchases = purchases(gateway.clone());
    purchases.purchase(&student(), "course-101").unwrap();

    let err = purchases.purchase(&student(), "course-101").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(err.reason(), "already purchased");
    assert_eq!(gateway.charges(), 1);
}

#[test]
fn declined_payment_leaves_no_record() {
    let gateway = Arc::new(ScriptedGateway::declining());
    let purchases = purchases(gateway.clone());

    let err = purchases.purchase(&student(), "course-101").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PaymentFailed);
    assert_eq!(err.reason(), "payment failed");
    assert!(!purchases.has_active_purchase("student@example.com", "course-101").unwrap());
    assert!(purchases.transactions(&student()).unwrap().is_empty());
}

#[test]
fn unknown_course_and_anonymous_buyer_are_not_charged() {
    let gateway = Arc::new(ScriptedGateway::default());
    let purchases = purchases(gateway.clone());

    let err = purchases.purchase(&Principal::anonymous(), "course-101").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationRequired);

    let err = purchases.purchase(&student(), "course-404").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.reason(), "course not found");

    assert_eq!(gateway.charges(), 0);
}

#[test]
fn default_gateway_declines() {
    let catalog = InMemoryCatalog::from_courses([Course::new("course-101", "Rust")]);
    let purchases =
        init(Ledger::in_memory(), Arc::new(catalog), Arc::new(DecliningGateway), Arc::new(SystemClock));

    let err = purchases.purchase(&student(), "course-101").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PaymentFailed);
}

#[test]
fn refund_then_repurchase() {
    let gateway = Arc::new(ScriptedGateway::default());
    let purchases = purchases(gateway.clone());
    purchases.purchase(&student(), "course-101").unwrap();

    let refunded = purchases.refund("student@example.com", "course-101").unwrap();
    assert!(!refunded.is_active());
    assert!(!purchases.has_active_purchase("student@example.com", "course-101").unwrap());

    let err = purchases.refund("student@example.com", "course-101").unwrap_err();
    assert_eq!(err.reason(), "not purchased");

    let again = purchases.purchase(&student(), "course-101").unwrap();
    assert!(again.is_active());
    assert_eq!(purchases.transactions(&student()).unwrap().len(), 2);
}

#[test]
fn failed_audit_append_leaves_no_purchase() {
    let store = Arc::new(AuditFailingStore::default());
    store.fail_audit.store(true, Ordering::SeqCst);
    let (purchases, ledger) = purchases_over(store);

    let err = purchases.purchase(&student(), "course-101").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(!purchases.has_active_purchase("student@example.com", "course-101").unwrap());
    let key = LedgerKey::purchase("student@example.com", "course-101");
    assert!(ledger.get(&key).unwrap().is_none());
    assert!(purchases.transactions(&student()).unwrap().is_empty());
}

#[test]
fn failed_audit_on_repurchase_restores_the_refund() {
    let store = Arc::new(AuditFailingStore::default());
    let (purchases, ledger) = purchases_over(store.clone());
    let key = LedgerKey::purchase("student@example.com", "course-101");

    purchases.purchase(&student(), "course-101").unwrap();
    purchases.refund("student@example.com", "course-101").unwrap();
    let before = store.get(&key).unwrap().unwrap();

    store.fail_audit.store(true, Ordering::SeqCst);
    assert!(purchases.purchase(&student(), "course-101").is_err());

    assert_eq!(store.get(&key).unwrap(), Some(before));
    let record = ledger.get(&key).unwrap().unwrap();
    assert!(!record.as_purchase().unwrap().is_active());
    assert_eq!(purchases.transactions(&student()).unwrap().len(), 1);
}

#[test]
fn content_requires_active_purchase() {
    let gateway = Arc::new(ScriptedGateway::default());
    let purchases = purchases(gateway.clone());

    let err = purchases.materials(&student(), "course-101").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthorizationDenied);
    assert_eq!(err.reason(), "not purchased");

    purchases.purchase(&student(), "course-101").unwrap();
    assert_eq!(purchases.materials(&student(), "course-101").unwrap(), ["syllabus.pdf"]);
    assert_eq!(purchases.assessments(&student(), "course-101").unwrap(), ["Final exam"]);

    purchases.refund("student@example.com", "course-101").unwrap();
    assert!(purchases.assessments(&student(), "course-101").is_err());
}

#[test]
fn concurrent_purchases_charge_once() {
    let gateway = Arc::new(ScriptedGateway::default());
    let purchases = purchases(gateway.clone());
    let buyer = student();

    let succeeded = std::thread::scope(|s| {
        let handles: Vec<_> =
            (0..8).map(|_| s.spawn(|| purchases.purchase(&buyer, "course-101").is_ok())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count()
    });

    assert_eq!(succeeded, 1);
    assert_eq!(gateway.charges(), 1);
}

#[test]
fn rule_order() {
    assert_eq!(
        purchase_chain().rule_names(),
        ["authenticated", "course exists", "no active purchase", "payment succeeds"]
    );
}
