use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::debug;

use matome_core::{
    MatomeError, RequestDescriptor, ServiceItem, ServiceName, Subscription, Transport, resolve,
};

use crate::Matome;

impl Matome {
    /// Aggregate one user's subscriptions into a combined result.
    ///
    /// Every subscription is resolved up front and classified by transport.
    /// TLS legs run serially, in subscription order, each completing its
    /// full cache round trip before the next starts; plain legs fan out
    /// through the bounded pool and interleave freely with the serial legs.
    /// All started legs are awaited before returning.
    ///
    /// # Errors
    /// Returns the first `Upstream`/`Timeout` failure; partial successes are
    /// discarded (all-or-nothing).
    pub async fn aggregate(
        &self,
        subscriptions: &[Subscription],
    ) -> Result<Vec<ServiceItem>, MatomeError> {
        let mut serial: Vec<(ServiceName, RequestDescriptor)> = Vec::new();
        let mut pooled: Vec<(ServiceName, RequestDescriptor)> = Vec::new();
        for sub in subscriptions {
            let descriptor = resolve(sub);
            match sub.service.transport() {
                Transport::Tls => serial.push((sub.service, descriptor)),
                Transport::Plain => pooled.push((sub.service, descriptor)),
            }
        }
        debug!(
            serial = serial.len(),
            pooled = pooled.len(),
            "aggregation legs classified"
        );

        // One leg at a time against the rate-limited TLS endpoints; stops at
        // the first failure (nothing further is started), while tokio::join!
        // below still drains every pooled leg already submitted.
        let serial_branch = async {
            let mut items = Vec::with_capacity(serial.len());
            for (service, descriptor) in &serial {
                let data = Self::leg_with_timeout(
                    self.cfg.leg_timeout,
                    *service,
                    self.fetcher.fetch(*service, descriptor),
                )
                .await?;
                items.push(ServiceItem {
                    service: *service,
                    data,
                });
            }
            Ok::<_, MatomeError>(items)
        };

        let pool_size = self.cfg.pool_size.max(1);
        let pooled_branch = stream::iter(pooled.iter().map(|(service, descriptor)| {
            let fetcher = Arc::clone(&self.fetcher);
            let timeout = self.cfg.leg_timeout;
            async move {
                let data =
                    Self::leg_with_timeout(timeout, *service, fetcher.fetch(*service, descriptor))
                        .await?;
                Ok::<_, MatomeError>(ServiceItem {
                    service: *service,
                    data,
                })
            }
        }))
        .buffer_unordered(pool_size)
        .collect::<Vec<Result<ServiceItem, MatomeError>>>();

        let (serial_out, pooled_out) = tokio::join!(serial_branch, pooled_branch);

        let mut items = serial_out?;
        items.reserve(pooled_out.len());
        for res in pooled_out {
            items.push(res?);
        }
        Ok(items)
    }

    /// Load a user's subscription set from the store and aggregate it.
    ///
    /// # Errors
    /// Returns `NotFound` when the user has no stored subscription set, plus
    /// anything [`Matome::aggregate`] can return.
    pub async fn aggregate_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ServiceItem>, MatomeError> {
        let set = self.fetch_subscriptions(user_id).await?;
        self.aggregate(set.as_slice()).await
    }
}
