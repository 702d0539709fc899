use crate::core::models::stats::Dashboard;
use crate::core::ports::repository::{EventCommon, OrganisasiCommon, ParticipantCommon, PaymentCommon, UserCommon};
use crate::error::Error;

pub async fn dashboard<D>(db: &mut D) -> Result<Dashboard, Error>
where
    D: UserCommon + OrganisasiCommon + EventCommon + ParticipantCommon + PaymentCommon,
{
    Ok(Dashboard {
        users_by_role: UserCommon::count_by_role(db).await?,
        organisasi_by_plan: OrganisasiCommon::count_by_plan(db).await?,
        events: EventCommon::count_all(db).await?,
        registrations_by_status: ParticipantCommon::count_by_status(db).await?,
        payments_by_status: PaymentCommon::count_by_status(db).await?,
        confirmed_revenue: PaymentCommon::confirmed_revenue(db).await?,
    })
}
