#[cfg(test)]
mod tests {
    use crate::catalog::{
        CatalogRepositoryTrait, NewRepairItem, NewSchool, RepairItem, School, SchoolUpdate,
    };
    use crate::errors::{DatabaseError, Error, ErrorKind, Result};
    use crate::quotations::{
        NewQuotation, Quotation, QuotationFilter, QuotationLine, QuotationRepositoryTrait,
        QuotationService, QuotationServiceTrait, QuotationSubmission,
    };
    use crate::utils::time_utils::Clock;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Local, TimeZone};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex, RwLock};

    // --- Fixed clock ---
    struct FixedClock(DateTime<Local>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Local> {
            self.0
        }
    }

    fn fixed_clock() -> Arc<FixedClock> {
        let now = Local
            .with_ymd_and_hms(2024, 5, 1, 10, 30, 0)
            .unwrap()
            .checked_add_signed(Duration::milliseconds(123))
            .unwrap();
        Arc::new(FixedClock(now))
    }

    // --- Mock CatalogRepository ---
    struct MockCatalog {
        schools: RwLock<Vec<School>>,
    }

    impl MockCatalog {
        fn with_schools(names: &[(i64, &str)]) -> Self {
            Self {
                schools: RwLock::new(
                    names
                        .iter()
                        .map(|(id, name)| School {
                            id: *id,
                            name: name.to_string(),
                        })
                        .collect(),
                ),
            }
        }

        fn rename(&self, school_id: i64, name: &str) {
            let mut schools = self.schools.write().unwrap();
            if let Some(school) = schools.iter_mut().find(|s| s.id == school_id) {
                school.name = name.to_string();
            }
        }
    }

    #[async_trait]
    impl CatalogRepositoryTrait for MockCatalog {
        fn get_school(&self, school_id: i64) -> Result<Option<School>> {
            Ok(self
                .schools
                .read()
                .unwrap()
                .iter()
                .find(|s| s.id == school_id)
                .cloned())
        }
        fn list_schools(&self) -> Result<Vec<School>> {
            Ok(self.schools.read().unwrap().clone())
        }
        fn get_item(&self, _: i64, _: i64) -> Result<Option<RepairItem>> {
            Ok(None)
        }
        fn list_items(&self, _: i64) -> Result<Vec<RepairItem>> {
            unimplemented!()
        }
        async fn create_school(&self, _: NewSchool) -> Result<School> {
            unimplemented!()
        }
        async fn rename_school(&self, _: i64, _: SchoolUpdate) -> Result<School> {
            unimplemented!()
        }
        async fn create_item(&self, _: NewRepairItem) -> Result<RepairItem> {
            unimplemented!()
        }
        async fn ensure_sentinel_items(&self) -> Result<usize> {
            unimplemented!()
        }
    }

    // --- Mock QuotationRepository ---
    #[derive(Default)]
    struct MockQuotationRepository {
        quotations: Mutex<Vec<Quotation>>,
        next_line_id: AtomicU32,
        create_calls: AtomicU32,
    }

    impl MockQuotationRepository {
        fn count(&self) -> usize {
            self.quotations.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl QuotationRepositoryTrait for MockQuotationRepository {
        async fn create(&self, new_quotation: NewQuotation) -> Result<i64> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            new_quotation.validate()?;
            for (index, line) in new_quotation.lines.iter().enumerate() {
                line.validate(index)?;
            }

            let mut quotations = self.quotations.lock().unwrap();
            if quotations
                .iter()
                .any(|q| q.quotation_number == new_quotation.quotation_number)
            {
                return Err(Error::Database(DatabaseError::UniqueViolation(
                    new_quotation.quotation_number,
                )));
            }

            let id = quotations.iter().map(|q| q.id).max().unwrap_or(0) + 1;
            let lines = new_quotation
                .lines
                .into_iter()
                .map(|line| QuotationLine {
                    id: i64::from(self.next_line_id.fetch_add(1, Ordering::SeqCst)) + 1,
                    quotation_id: id,
                    item_id: line.item_id,
                    name: line.name,
                    price: line.price,
                    unit: line.unit,
                    quantity: line.quantity,
                    subtotal: line.subtotal,
                })
                .collect();
            quotations.push(Quotation {
                id,
                quotation_number: new_quotation.quotation_number,
                school_id: new_quotation.school_id,
                school_name: new_quotation.school_name,
                repair_person: new_quotation.repair_person,
                repair_location: new_quotation.repair_location,
                repair_time: new_quotation.repair_time,
                lines,
                total_price: new_quotation.total_price,
                created_at: new_quotation.created_at,
            });
            Ok(id)
        }

        async fn delete(&self, quotation_id: i64) -> Result<usize> {
            let mut quotations = self.quotations.lock().unwrap();
            let position = quotations
                .iter()
                .position(|q| q.id == quotation_id)
                .ok_or_else(|| {
                    crate::quotations::QuotationError::NotFound(format!(
                        "Quotation {}",
                        quotation_id
                    ))
                })?;
            Ok(quotations.remove(position).lines.len())
        }

        fn get_by_id(&self, quotation_id: i64) -> Result<Option<Quotation>> {
            Ok(self
                .quotations
                .lock()
                .unwrap()
                .iter()
                .find(|q| q.id == quotation_id)
                .cloned())
        }

        fn list(&self, filter: &QuotationFilter) -> Result<Vec<Quotation>> {
            let mut matching: Vec<Quotation> = self
                .quotations
                .lock()
                .unwrap()
                .iter()
                .filter(|q| matches_filter(filter, q))
                .cloned()
                .collect();
            matching.sort_by(|a, b| b.id.cmp(&a.id));
            let offset = filter.offset.unwrap_or(0) as usize;
            let limit = filter.limit.map(|l| l as usize).unwrap_or(usize::MAX);
            Ok(matching.into_iter().skip(offset).take(limit).collect())
        }
    }

    /// Repository whose every write collides on the quotation number.
    struct AlwaysTakenRepository {
        attempts: AtomicU32,
    }

    #[async_trait]
    impl QuotationRepositoryTrait for AlwaysTakenRepository {
        async fn create(&self, new_quotation: NewQuotation) -> Result<i64> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(Error::Database(DatabaseError::UniqueViolation(
                new_quotation.quotation_number,
            )))
        }
        async fn delete(&self, _: i64) -> Result<usize> {
            unimplemented!()
        }
        fn get_by_id(&self, _: i64) -> Result<Option<Quotation>> {
            unimplemented!()
        }
        fn list(&self, _: &QuotationFilter) -> Result<Vec<Quotation>> {
            unimplemented!()
        }
    }

    struct Fixture {
        catalog: Arc<MockCatalog>,
        repository: Arc<MockQuotationRepository>,
        service: QuotationService,
    }

    fn fixture() -> Fixture {
        let catalog = Arc::new(MockCatalog::with_schools(&[(1, "North"), (2, "South")]));
        let repository = Arc::new(MockQuotationRepository::default());
        let service =
            QuotationService::with_clock(catalog.clone(), repository.clone(), fixed_clock());
        Fixture {
            catalog,
            repository,
            service,
        }
    }

    /// School and date bounds only; paging is applied by the caller.
    fn matches_filter(filter: &QuotationFilter, quotation: &Quotation) -> bool {
        filter.school_id.map_or(true, |id| quotation.school_id == id)
            && filter
                .start
                .as_deref()
                .map_or(true, |start| quotation.created_at.as_str() >= start)
            && filter
                .end
                .as_deref()
                .map_or(true, |end| quotation.created_at.as_str() <= end)
    }

    fn submission(school_id: i64) -> QuotationSubmission {
        serde_json::from_value(json!({
            "school_id": school_id,
            "repair_person": "Li",
            "repair_location": "Lab 3",
            "repair_time": "2024-05-01T10:30",
            "total_price": 25.5,
            "items": [
                {"item_id": 1, "name": "Faucet", "price": 10.0, "unit": "piece", "quantity": 2, "subtotal": 20.0},
                {"item_id": 2, "name": "Washer", "price": 5.5, "unit": "piece", "quantity": 1, "subtotal": 5.5}
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_submit_returns_stored_quotation() {
        let f = fixture();
        let quotation = f.service.submit_quotation(submission(1)).await.unwrap();

        assert_eq!(quotation.quotation_number, "Q20240501103000123");
        assert_eq!(quotation.school_name, "North");
        assert_eq!(quotation.repair_time, "2024-05-01T10:30:00");
        assert_eq!(quotation.total_price, dec!(25.5));
        assert_eq!(quotation.created_at, "2024-05-01T10:30:00.123000");
        assert_eq!(quotation.lines.len(), 2);
        assert_eq!(quotation.lines[0].name, "Faucet");
        assert_eq!(quotation.lines[1].subtotal, dec!(5.5));
    }

    #[tokio::test]
    async fn test_round_trip_preserves_lines() {
        let f = fixture();
        let created = f.service.submit_quotation(submission(1)).await.unwrap();
        let fetched = f.service.get_quotation(created.id).unwrap();
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn test_invalid_line_writes_nothing() {
        let f = fixture();
        let mut bad = submission(1);
        if let Some(items) = bad.items.as_mut() {
            items[1].quantity = Some(json!(-1));
        }

        let err = f.service.submit_quotation(bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NegativeValue);
        assert_eq!(f.repository.count(), 0);
        assert_eq!(f.repository.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_school_is_not_found() {
        let f = fixture();
        let err = f.service.submit_quotation(submission(99)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(f.repository.count(), 0);
    }

    #[tokio::test]
    async fn test_school_rename_does_not_touch_existing_quotation() {
        let f = fixture();
        let created = f.service.submit_quotation(submission(1)).await.unwrap();

        f.catalog.rename(1, "North Campus");

        let fetched = f.service.get_quotation(created.id).unwrap();
        assert_eq!(fetched.school_name, "North");
    }

    #[tokio::test]
    async fn test_delete_removes_quotation_once() {
        let f = fixture();
        let created = f.service.submit_quotation(submission(1)).await.unwrap();

        f.service.delete_quotation(created.id).await.unwrap();
        assert!(f.service.get_quotation(created.id).unwrap_err().is_not_found());

        let err = f.service.delete_quotation(created.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_colliding_number_is_retried() {
        let f = fixture();
        let first = f.service.submit_quotation(submission(1)).await.unwrap();
        let second = f.service.submit_quotation(submission(1)).await.unwrap();

        assert_eq!(first.quotation_number, "Q20240501103000123");
        assert_eq!(second.quotation_number, "Q20240501103000124");
        assert_eq!(f.repository.create_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_bounded_attempts() {
        let catalog = Arc::new(MockCatalog::with_schools(&[(1, "North")]));
        let repository = Arc::new(AlwaysTakenRepository {
            attempts: AtomicU32::new(0),
        });
        let service = QuotationService::with_clock(catalog, repository.clone(), fixed_clock());

        let err = service.submit_quotation(submission(1)).await.unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(err.kind(), ErrorKind::StoreFailure);
        assert_eq!(repository.attempts.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_filters_by_school() {
        let f = fixture();
        f.service.submit_quotation(submission(1)).await.unwrap();
        f.service.submit_quotation(submission(2)).await.unwrap();
        f.service.submit_quotation(submission(1)).await.unwrap();

        let all = f
            .service
            .list_quotations(&QuotationFilter::default())
            .unwrap();
        let ids: Vec<i64> = all.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(all.iter().all(|q| q.lines.len() == 2));

        let north = f
            .service
            .list_quotations(&QuotationFilter::for_school(1))
            .unwrap();
        let ids: Vec<i64> = north.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn test_list_of_unknown_school_is_empty() {
        let f = fixture();
        f.service.submit_quotation(submission(1)).await.unwrap();
        let none = f
            .service
            .list_quotations(&QuotationFilter::for_school(42))
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_export_of_empty_selection_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .export_quotations(&QuotationFilter::default())
            .unwrap_err();
        assert!(err.is_not_found());

        f.service.submit_quotation(submission(1)).await.unwrap();
        let sheet = f
            .service
            .export_quotations(&QuotationFilter::default())
            .unwrap();
        assert_eq!(sheet.rows.len(), 1);
    }
}
