use chrono::{Duration, Local, NaiveDate};
use recordhub_core::{
    Action, AdminSeed, Customer, Employee, MembershipLevel, RecordsService, Resource, Role,
    ServiceError, StorageHandle, UpdateOutcome, ValidationError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_service(handle: &StorageHandle) -> RecordsService<'_> {
    let service = RecordsService::new(handle);
    service
        .save_employee(&Employee::new("e1", "Ada", 30, 1000.0, "Engineer"))
        .unwrap();
    service
        .save_employee(&Employee::new("e2", "Grace", 40, 3000.0, "Engineer"))
        .unwrap();
    service
        .save_employee(&Employee::new("e3", "Linus", 50, 2000.0, "Manager"))
        .unwrap();
    service
        .save_customer(&Customer::new("c1", "Jane", 20, MembershipLevel::Gold, date(2024, 1, 1)))
        .unwrap();
    service
        .save_customer(&Customer::new("c2", "John", 60, MembershipLevel::Gold, date(2024, 2, 1)))
        .unwrap();
    service
        .save_customer(&Customer::new("c3", "Jill", 40, MembershipLevel::Bronze, date(2024, 3, 1)))
        .unwrap();
    service
}

#[test]
fn customer_with_past_purchase_date_is_saved() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let service = RecordsService::new(&handle);

    let yesterday = Local::now().date_naive() - Duration::days(1);
    let customer = Customer::new("c1", "Jane", 30, MembershipLevel::Platinum, yesterday);
    service.save_customer(&customer).unwrap();

    assert_eq!(service.get_customer_by_id("c1").unwrap(), customer);
}

#[test]
fn customer_with_future_purchase_date_is_rejected_before_storage() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let service = RecordsService::new(&handle);

    let tomorrow = Local::now().date_naive() + Duration::days(1);
    let err = service
        .save_customer(&Customer::new("c1", "Jane", 30, MembershipLevel::Gold, tomorrow))
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::FuturePurchaseDate { .. })
    ));
    assert!(service.get_all_customers().unwrap().is_empty());
}

#[test]
fn underage_employee_is_rejected() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let service = RecordsService::new(&handle);

    let err = service
        .save_employee(&Employee::new("e1", "Kid", 17, 10.0, "Intern"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::Underage { age: 17 })
    ));
    assert!(matches!(
        service.get_employee_by_id("e1").unwrap_err(),
        ServiceError::NotFound { entity: "employee", .. }
    ));
}

#[test]
fn update_validates_and_reports_no_match() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let service = seeded_service(&handle);

    let mut employee = service.get_employee_by_id("e1").unwrap();
    employee.salary = 1500.0;
    assert_eq!(
        service.update_employee(&employee).unwrap(),
        UpdateOutcome::Updated
    );
    assert_eq!(service.get_employee_by_id("e1").unwrap().salary, 1500.0);

    employee.age = 12;
    assert!(matches!(
        service.update_employee(&employee).unwrap_err(),
        ServiceError::Validation(_)
    ));

    let ghost = Employee::new("ghost", "Nobody", 30, 1.0, "Clerk");
    assert_eq!(
        service.update_employee(&ghost).unwrap(),
        UpdateOutcome::NoMatch
    );
}

#[test]
fn delete_removes_record_once() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let service = seeded_service(&handle);

    assert!(service.delete_customer("c3").unwrap());
    assert!(!service.delete_customer("c3").unwrap());
    assert_eq!(service.get_all_customers().unwrap().len(), 2);
}

#[test]
fn analytics_over_stored_records() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let service = seeded_service(&handle);

    assert_eq!(service.average_age().unwrap(), 40.0);
    assert_eq!(service.average_salary().unwrap(), 2000.0);
    assert_eq!(service.membership_count("gold").unwrap(), 2);
    assert_eq!(service.membership_count("Diamond").unwrap(), 0);

    let by_title = service.average_salary_by_job_title().unwrap();
    assert_eq!(by_title.get("Engineer"), Some(&2000.0));
    assert_eq!(by_title.get("Manager"), Some(&2000.0));

    let per_title = service.employees_per_job_title().unwrap();
    assert_eq!(per_title.get("Engineer"), Some(&2));

    let per_level = service.customers_per_membership_level().unwrap();
    assert_eq!(per_level.get(&MembershipLevel::Gold), Some(&2));
    assert_eq!(per_level.get(&MembershipLevel::Bronze), Some(&1));
    assert!(!per_level.contains_key(&MembershipLevel::Silver));
}

#[test]
fn analytics_on_empty_store_are_zero() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let service = RecordsService::new(&handle);

    assert_eq!(service.average_age().unwrap(), 0.0);
    assert_eq!(service.average_salary().unwrap(), 0.0);
    assert!(service.employees_per_job_title().unwrap().is_empty());
}

#[test]
fn export_tables_carry_headers_and_formatted_rows() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let service = seeded_service(&handle);

    let employees = service.employee_export_table().unwrap();
    assert_eq!(
        employees.header,
        vec!["ID", "Name", "Age", "Salary", "JobTitle"]
    );
    assert_eq!(
        employees.rows[0],
        vec!["e1", "Ada", "30", "1000.00", "Engineer"]
    );

    let customers = service.customer_export_table().unwrap();
    assert_eq!(customers.rows.len(), 3);
    assert_eq!(
        customers.rows[2],
        vec!["c3", "Jill", "40", "Bronze", "2024-03-01"]
    );
}

#[test]
fn authorize_requires_a_session() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let service = RecordsService::new(&handle);

    assert!(matches!(
        service.authorize(Action::View, Resource::Employees).unwrap_err(),
        ServiceError::NotAuthenticated
    ));
}

#[test]
fn authorize_follows_role_table() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let mut service = RecordsService::new(&handle);
    service
        .register_new_user("hr", "pw", Role::HrSpecialist)
        .unwrap();
    service.login("hr", "pw").unwrap();

    assert_eq!(
        service.authorize(Action::Delete, Resource::Employees).unwrap(),
        Role::HrSpecialist
    );
    let denied = service
        .authorize(Action::Update, Resource::Customers)
        .unwrap_err();
    assert!(matches!(
        denied,
        ServiceError::AccessDenied {
            role: Role::HrSpecialist,
            action: Action::Update,
            resource: Resource::Customers,
        }
    ));

    service.logout();
    assert!(service.active_user().is_none());
    assert!(matches!(
        service.authorize(Action::View, Resource::Employees).unwrap_err(),
        ServiceError::NotAuthenticated
    ));
}

#[test]
fn bootstrap_seeds_admin_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.sqlite3");
    let seed = AdminSeed::default();

    {
        let handle = StorageHandle::open(&path).unwrap();
        let mut service = RecordsService::bootstrap(&handle, &seed).unwrap();
        let admin = service.login("admin", "password123").unwrap();
        assert_eq!(admin.role, Role::Admin);
        service.session_mut().change_password("admin", "rotated").unwrap();
    }

    let handle = StorageHandle::open(&path).unwrap();
    let mut service = RecordsService::bootstrap(&handle, &seed).unwrap();
    assert_eq!(service.get_all_users().unwrap().len(), 1);
    assert!(matches!(
        service.login("admin", "password123").unwrap_err(),
        ServiceError::Auth(_)
    ));
    assert!(service.login("admin", "rotated").is_ok());
}

#[test]
fn deleting_active_user_through_service_logs_out() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let mut service = RecordsService::bootstrap(&handle, &AdminSeed::default()).unwrap();
    service.login("admin", "password123").unwrap();
    service.authorize(Action::Delete, Resource::Users).unwrap();

    assert!(service.delete_user("admin").unwrap());
    assert!(service.active_user().is_none());
}
