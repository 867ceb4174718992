use shared::protocol::{DashboardCounts, ListQuery};
use tracing::debug;

use crate::{
    error::GatewayError,
    gateway::ResourceGateway,
    resources::{Classrooms, Resource, Students, Subjects, Teachers},
};

async fn count<R, G>(gateway: &G) -> Result<u64, GatewayError>
where
    R: Resource,
    G: ResourceGateway<R> + ?Sized,
{
    let page = <G as ResourceGateway<R>>::list(gateway, &ListQuery::with_page_size(1)).await?;
    debug!(resource = R::LABEL, total = page.total, "dashboard count");
    Ok(page.total)
}

/// Headline counts for the dashboard, requested concurrently.
pub async fn load_counts<G>(gateway: &G) -> Result<DashboardCounts, GatewayError>
where
    G: ResourceGateway<Teachers>
        + ResourceGateway<Students>
        + ResourceGateway<Classrooms>
        + ResourceGateway<Subjects>,
{
    let (teachers, students, classrooms, subjects) = futures::try_join!(
        count::<Teachers, G>(gateway),
        count::<Students, G>(gateway),
        count::<Classrooms, G>(gateway),
        count::<Subjects, G>(gateway),
    )?;
    Ok(DashboardCounts {
        teachers,
        students,
        classrooms,
        subjects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use shared::protocol::Page;

    struct FixedCounts;

    #[async_trait]
    impl<R: Resource> ResourceGateway<R> for FixedCounts {
        async fn list(&self, query: &ListQuery) -> Result<Page<R::Record>, GatewayError> {
            let total = match R::PATH {
                "teachers" => 42,
                "students" => 610,
                "classrooms" => 18,
                "subjects" => 0,
                _ => {
                    return Err(GatewayError::NotFound {
                        path: R::PATH.to_string(),
                    })
                }
            };
            assert_eq!(query.page_size, 1);
            Ok(Page {
                items: Vec::new(),
                total,
                page: 1,
                page_size: query.page_size,
            })
        }

        async fn get(&self, _id: R::Id) -> Result<R::Record, GatewayError> {
            Err(GatewayError::Cancelled)
        }

        async fn create(&self, _draft: &R::Draft) -> Result<R::Record, GatewayError> {
            Err(GatewayError::Cancelled)
        }

        async fn update(&self, _id: R::Id, _draft: &R::Draft) -> Result<R::Record, GatewayError> {
            Err(GatewayError::Cancelled)
        }

        async fn delete(&self, _id: R::Id) -> Result<(), GatewayError> {
            Err(GatewayError::Cancelled)
        }
    }

    #[tokio::test]
    async fn counts_come_from_page_totals() {
        let counts = load_counts(&FixedCounts).await.expect("counts");
        assert_eq!(
            counts,
            DashboardCounts {
                teachers: 42,
                students: 610,
                classrooms: 18,
                subjects: 0,
            }
        );
    }
}
