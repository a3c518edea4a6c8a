//! Aggregator: merges vendor listings, sorts and paginates
//!
//! Vendors are queried concurrently (bounded) but results are reassembled in
//! vendor order, so the merged sequence is vendor order then upstream order.
//! One failing vendor fails the whole listing.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use types::ids::IdGenerator;
use types::product::{sort_products, Product};
use types::query::{ListingQuery, PriceRange};
use types::vendor::Vendor;

use crate::vendor::{VendorClient, VendorError};

pub const DEFAULT_MAX_PAGE_SIZE: usize = 10;

pub struct Aggregator {
    client: Arc<dyn VendorClient>,
    ids: Arc<dyn IdGenerator>,
    vendors: Vec<Vendor>,
    concurrency: usize,
    max_page_size: usize,
}

impl Aggregator {
    pub fn new(client: Arc<dyn VendorClient>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            client,
            ids,
            vendors: Vendor::ALL.to_vec(),
            concurrency: Vendor::ALL.len(),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    pub fn with_vendors(mut self, vendors: Vec<Vendor>) -> Self {
        self.vendors = vendors;
        self
    }

    /// Upper bound on in-flight vendor requests (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Every vendor's products for `category`, stamped with fresh ids
    pub async fn collect(
        &self,
        category: &str,
        price_range: &PriceRange,
    ) -> Result<Vec<Product>, VendorError> {
        let client = &self.client;
        let fetches = self.vendors.iter().copied().map(|vendor| async move {
            client
                .fetch_products(vendor, category, price_range)
                .await
                .map(|items| (vendor, items))
        });

        let batches: Vec<_> = stream::iter(fetches)
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let products: Vec<Product> = batches
            .into_iter()
            .flat_map(|(vendor, items)| {
                items
                    .into_iter()
                    .map(move |raw| Product::from_raw(raw, vendor, self.ids.next_id()))
            })
            .collect();

        tracing::debug!(
            category,
            vendors = self.vendors.len(),
            products = products.len(),
            "merged vendor listings"
        );
        Ok(products)
    }

    /// One page of the merged, optionally sorted, listing
    pub async fn list(
        &self,
        category: &str,
        query: &ListingQuery,
    ) -> Result<Vec<Product>, VendorError> {
        let mut products = self.collect(category, &query.price_range).await?;

        if let Some(spec) = &query.sort {
            sort_products(&mut products, spec);
        }

        Ok(query.window(self.max_page_size).apply(products))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use types::ids::SequentialIdGenerator;
    use types::product::RawProduct;
    use types::query::ListingParams;

    /// Serves canned listings per vendor, optionally after a per-vendor
    /// delay, and records call order, completion order and peak in-flight
    #[derive(Default)]
    struct FakeVendors {
        listings: HashMap<Vendor, Vec<RawProduct>>,
        failing: Option<Vendor>,
        delays: HashMap<Vendor, Duration>,
        calls: Mutex<Vec<Vendor>>,
        completed: Mutex<Vec<Vendor>>,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl FakeVendors {
        fn with_prices(prices: &[(Vendor, &[u32])]) -> Self {
            let listings = prices
                .iter()
                .map(|(vendor, ps)| {
                    let items = ps
                        .iter()
                        .enumerate()
                        .map(|(i, p)| object(json!({
                            "productName": format!("{vendor}-{i}"),
                            "price": p,
                            "rating": 5 - (i as u32 % 5),
                        })))
                        .collect();
                    (*vendor, items)
                })
                .collect();
            Self {
                listings,
                ..Default::default()
            }
        }
    }

    fn object(value: Value) -> RawProduct {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[async_trait]
    impl VendorClient for FakeVendors {
        async fn fetch_products(
            &self,
            vendor: Vendor,
            _category: &str,
            _price_range: &PriceRange,
        ) -> Result<Vec<RawProduct>, VendorError> {
            self.calls.lock().unwrap().push(vendor);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delays.get(&vendor) {
                tokio::time::sleep(*delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.completed.lock().unwrap().push(vendor);
            if self.failing == Some(vendor) {
                return Err(VendorError::Status {
                    vendor,
                    status: StatusCode::SERVICE_UNAVAILABLE,
                });
            }
            Ok(self.listings.get(&vendor).cloned().unwrap_or_default())
        }
    }

    fn aggregator(vendors: FakeVendors) -> Aggregator {
        Aggregator::new(Arc::new(vendors), Arc::new(SequentialIdGenerator::new("p")))
    }

    fn query(pairs: &[(&str, &str)]) -> ListingQuery {
        let mut params = ListingParams::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "n" => params.n = v,
                "sort" => params.sort = v,
                "order" => params.order = v,
                "page" => params.page = v,
                other => panic!("unknown param {other}"),
            }
        }
        ListingQuery::parse(&params).unwrap()
    }

    fn names(products: &[Product]) -> Vec<String> {
        products
            .iter()
            .map(|p| p.attributes["productName"].as_str().unwrap().to_string())
            .collect()
    }

    fn five_vendors() -> FakeVendors {
        FakeVendors::with_prices(&[
            (Vendor::Amz, &[500, 100, 300][..]),
            (Vendor::Flp, &[250, 50][..]),
            (Vendor::Snp, &[900][..]),
            (Vendor::Myn, &[10, 20, 30][..]),
            (Vendor::Azo, &[700, 600, 800][..]),
        ])
    }

    #[tokio::test]
    async fn test_merge_follows_vendor_order() {
        let agg = aggregator(five_vendors());
        let all = agg.collect("laptops", &PriceRange::default()).await.unwrap();

        assert_eq!(all.len(), 12);
        assert_eq!(
            names(&all),
            vec![
                "AMZ-0", "AMZ-1", "AMZ-2", "FLP-0", "FLP-1", "SNP-0", "MYN-0", "MYN-1", "MYN-2",
                "AZO-0", "AZO-1", "AZO-2"
            ]
        );
        assert_eq!(all[0].company, Vendor::Amz);
        assert_eq!(all[11].company, Vendor::Azo);
        assert_eq!(all[0].id.as_str(), "p-1");
        assert_eq!(all[11].id.as_str(), "p-12");
    }

    #[tokio::test]
    async fn test_page_size_capped_at_ten() {
        let agg = aggregator(five_vendors());
        let page = agg.list("laptops", &query(&[("n", "12")])).await.unwrap();
        assert_eq!(page.len(), 10);
        assert_eq!(names(&page)[9], "AZO-0");

        let second = agg
            .list("laptops", &query(&[("n", "12"), ("page", "2")]))
            .await
            .unwrap();
        assert_eq!(names(&second), vec!["AZO-1", "AZO-2"]);
    }

    #[tokio::test]
    async fn test_small_count_limits_page() {
        let agg = aggregator(five_vendors());
        let page = agg.list("laptops", &query(&[("n", "4")])).await.unwrap();
        assert_eq!(names(&page), vec!["AMZ-0", "AMZ-1", "AMZ-2", "FLP-0"]);
    }

    #[tokio::test]
    async fn test_sorted_by_price() {
        let agg = aggregator(five_vendors());
        let asc = agg
            .list("laptops", &query(&[("n", "5"), ("sort", "price"), ("order", "asc")]))
            .await
            .unwrap();
        let prices: Vec<f64> = asc.iter().filter_map(Product::price).collect();
        assert_eq!(prices, vec![10.0, 20.0, 30.0, 50.0, 100.0]);

        let desc = agg
            .list("laptops", &query(&[("n", "3"), ("sort", "price"), ("order", "desc")]))
            .await
            .unwrap();
        let prices: Vec<f64> = desc.iter().filter_map(Product::price).collect();
        assert_eq!(prices, vec![900.0, 800.0, 700.0]);
    }

    #[tokio::test]
    async fn test_sort_without_order_keeps_merge_order() {
        let agg = aggregator(five_vendors());
        let page = agg
            .list("laptops", &query(&[("n", "3"), ("sort", "price")]))
            .await
            .unwrap();
        assert_eq!(names(&page), vec!["AMZ-0", "AMZ-1", "AMZ-2"]);
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty() {
        let agg = aggregator(five_vendors());
        let page = agg
            .list("laptops", &query(&[("n", "10"), ("page", "3")]))
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_single_vendor_failure_fails_listing() {
        let mut vendors = five_vendors();
        vendors.failing = Some(Vendor::Snp);
        let agg = aggregator(vendors);

        let err = agg.list("laptops", &query(&[("n", "5")])).await.unwrap_err();
        assert_eq!(err.vendor(), Vendor::Snp);
    }

    #[tokio::test]
    async fn test_configured_vendor_subset() {
        let vendors = five_vendors();
        let agg = aggregator(vendors)
            .with_vendors(vec![Vendor::Myn, Vendor::Amz])
            .with_concurrency(1);
        let all = agg.collect("laptops", &PriceRange::default()).await.unwrap();
        assert_eq!(
            names(&all),
            vec!["MYN-0", "MYN-1", "MYN-2", "AMZ-0", "AMZ-1", "AMZ-2"]
        );
    }

    #[tokio::test]
    async fn test_sequential_fanout_stops_after_failure() {
        let mut vendors = five_vendors();
        vendors.failing = Some(Vendor::Flp);
        let fake = Arc::new(vendors);
        let agg = Aggregator::new(fake.clone(), Arc::new(SequentialIdGenerator::new("p")))
            .with_concurrency(1);

        assert!(agg.collect("laptops", &PriceRange::default()).await.is_err());
        assert_eq!(*fake.calls.lock().unwrap(), vec![Vendor::Amz, Vendor::Flp]);
    }

    /// Later vendors answer first: AMZ slowest, AZO fastest
    fn staggered_vendors() -> FakeVendors {
        let mut vendors = five_vendors();
        vendors.delays = Vendor::ALL
            .into_iter()
            .zip([500, 400, 300, 200, 100])
            .map(|(vendor, ms)| (vendor, Duration::from_millis(ms)))
            .collect();
        vendors
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_order_completion_keeps_vendor_order() {
        let fake = Arc::new(staggered_vendors());
        let agg = Aggregator::new(fake.clone(), Arc::new(SequentialIdGenerator::new("p")));

        let all = agg.collect("laptops", &PriceRange::default()).await.unwrap();

        assert_eq!(
            *fake.completed.lock().unwrap(),
            vec![Vendor::Azo, Vendor::Myn, Vendor::Snp, Vendor::Flp, Vendor::Amz]
        );
        let companies: Vec<Vendor> = all.iter().map(|p| p.company).collect();
        let mut expected = vec![Vendor::Amz; 3];
        expected.extend([Vendor::Flp; 2]);
        expected.push(Vendor::Snp);
        expected.extend([Vendor::Myn; 3]);
        expected.extend([Vendor::Azo; 3]);
        assert_eq!(companies, expected);
        assert_eq!(all[0].id.as_str(), "p-1");
        assert_eq!(fake.peak_in_flight.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_requests_bounded_by_concurrency() {
        for limit in 1..=4 {
            let fake = Arc::new(staggered_vendors());
            let agg = Aggregator::new(fake.clone(), Arc::new(SequentialIdGenerator::new("p")))
                .with_concurrency(limit);

            let all = agg.collect("laptops", &PriceRange::default()).await.unwrap();

            assert_eq!(all.len(), 12);
            assert_eq!(fake.peak_in_flight.load(Ordering::SeqCst), limit, "limit {limit}");
            assert_eq!(fake.calls.lock().unwrap().len(), 5);
        }
    }
}
