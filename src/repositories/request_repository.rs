use chrono::Utc;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{icontains, non_empty};
use crate::entities::sea_orm_active_enums::RequestStatus;
use crate::entities::{request, user};
use crate::utils::pagination::{Ordering, PageRequest};

pub const REQUEST_ORDERING: &[&str] = &["created_at"];

#[derive(Debug, Default, Clone)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub requester: Option<Uuid>,
    pub receiver: Option<Uuid>,
    /// Matched against requester and receiver usernames.
    pub search: Option<String>,
    /// Restricts to requests where this user is requester or receiver.
    pub involving: Option<Uuid>,
}

pub struct RequestRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RequestRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, request_id: Uuid) -> Result<Option<request::Model>, DbErr> {
        request::Entity::find_by_id(request_id).one(self.db).await
    }

    pub async fn find_page(
        &self,
        filter: &RequestFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<(Vec<request::Model>, u64), DbErr> {
        let mut query = request::Entity::find();

        if let Some(user_id) = filter.involving {
            query = query.filter(
                Condition::any()
                    .add(request::Column::RequesterId.eq(user_id))
                    .add(request::Column::ReceiverId.eq(user_id)),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(request::Column::Status.eq(status));
        }
        if let Some(requester) = filter.requester {
            query = query.filter(request::Column::RequesterId.eq(requester));
        }
        if let Some(receiver) = filter.receiver {
            query = query.filter(request::Column::ReceiverId.eq(receiver));
        }
        if let Some(search) = non_empty(filter.search.as_deref()) {
            let matching_users = Query::select()
                .column(user::Column::Id)
                .from(user::Entity)
                .and_where(icontains(user::Column::Username, search))
                .to_owned();
            query = query.filter(
                Condition::any()
                    .add(request::Column::RequesterId.in_subquery(matching_users.clone()))
                    .add(request::Column::ReceiverId.in_subquery(matching_users)),
            );
        }

        let total = query.clone().count(self.db).await?;

        let requests = query
            .order_by(request::Column::CreatedAt, ordering.order())
            .order_by_asc(request::Column::Id)
            .limit(page.page_size)
            .offset(page.offset())
            .all(self.db)
            .await?;

        Ok((requests, total))
    }

    pub async fn create(
        &self,
        requester_id: Uuid,
        receiver_id: Uuid,
        made_on_id: Uuid,
    ) -> Result<request::Model, DbErr> {
        let now = Utc::now().naive_utc();
        request::ActiveModel {
            id: Set(Uuid::new_v4()),
            requester_id: Set(requester_id),
            receiver_id: Set(receiver_id),
            made_on_id: Set(made_on_id),
            status: Set(RequestStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    /// Moves a request out of `Pending`. Returns rows written; 0 means the
    /// request was no longer pending.
    pub async fn transition_from_pending(
        &self,
        request_id: Uuid,
        to: RequestStatus,
    ) -> Result<u64, DbErr> {
        let result = request::Entity::update_many()
            .col_expr(request::Column::Status, Expr::value(to))
            .col_expr(request::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
            .filter(request::Column::Id.eq(request_id))
            .filter(request::Column::Status.eq(RequestStatus::Pending))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete(&self, request_id: Uuid) -> Result<u64, DbErr> {
        let result = request::Entity::delete_by_id(request_id).exec(self.db).await?;
        Ok(result.rows_affected)
    }
}
