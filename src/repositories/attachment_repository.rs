use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{icontains, non_empty};
use crate::entities::{attachment, attachment_share};
use crate::utils::pagination::{Ordering, PageRequest};

pub const ATTACHMENT_ORDERING: &[&str] = &["created_at", "title"];

#[derive(Debug, Default, Clone)]
pub struct AttachmentFilter {
    pub element: Option<Uuid>,
    pub search: Option<String>,
}

pub struct StoredFile<'f> {
    pub path: &'f str,
    pub file_name: &'f str,
    pub uploaded_by: Uuid,
    pub uploaded_at: NaiveDateTime,
}

pub struct AttachmentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AttachmentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<attachment::Model>, DbErr> {
        attachment::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_elements(&self, element_ids: &[Uuid]) -> Result<Vec<attachment::Model>, DbErr> {
        if element_ids.is_empty() {
            return Ok(Vec::new());
        }
        attachment::Entity::find()
            .filter(attachment::Column::ElementId.is_in(element_ids.iter().copied()))
            .order_by_asc(attachment::Column::CreatedAt)
            .order_by_asc(attachment::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn find_page(
        &self,
        filter: &AttachmentFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<(Vec<attachment::Model>, u64), DbErr> {
        let mut query = attachment::Entity::find();
        if let Some(element) = filter.element {
            query = query.filter(attachment::Column::ElementId.eq(element));
        }
        if let Some(search) = non_empty(filter.search.as_deref()) {
            query = query.filter(icontains(attachment::Column::Title, search));
        }

        let total = query.clone().count(self.db).await?;

        let column = match ordering.field.as_str() {
            "title" => attachment::Column::Title,
            _ => attachment::Column::CreatedAt,
        };
        let attachments = query
            .order_by(column, ordering.order())
            .order_by_asc(attachment::Column::Id)
            .limit(page.page_size)
            .offset(page.offset())
            .all(self.db)
            .await?;

        Ok((attachments, total))
    }

    /// New attachments start as empty placeholders.
    pub async fn create(&self, element_id: Uuid, title: String) -> Result<attachment::Model, DbErr> {
        let now = Utc::now().naive_utc();
        attachment::ActiveModel {
            id: Set(Uuid::new_v4()),
            element_id: Set(element_id),
            title: Set(title),
            file: Set(None),
            file_name: Set(None),
            uploaded_by: Set(None),
            uploaded_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn update(
        &self,
        model: attachment::Model,
        element_id: Option<Uuid>,
        title: Option<String>,
    ) -> Result<attachment::Model, DbErr> {
        let mut active: attachment::ActiveModel = model.into();
        if let Some(element_id) = element_id {
            active.element_id = Set(element_id);
        }
        if let Some(title) = title {
            active.title = Set(title);
        }
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(self.db).await
    }

    /// Sets file and uploader only while the slot is still empty. Returns the
    /// number of rows written, so 0 means another upload got there first.
    pub async fn attach_file_if_empty(
        &self,
        id: Uuid,
        stored: StoredFile<'_>,
    ) -> Result<u64, DbErr> {
        let result = attachment::Entity::update_many()
            .col_expr(attachment::Column::File, Expr::value(stored.path))
            .col_expr(attachment::Column::FileName, Expr::value(stored.file_name))
            .col_expr(attachment::Column::UploadedBy, Expr::value(stored.uploaded_by))
            .col_expr(attachment::Column::UploadedAt, Expr::value(stored.uploaded_at))
            .col_expr(attachment::Column::UpdatedAt, Expr::value(stored.uploaded_at))
            .filter(attachment::Column::Id.eq(id))
            .filter(
                Condition::any()
                    .add(attachment::Column::File.is_null())
                    .add(attachment::Column::File.eq("")),
            )
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Clears file and uploader together if `expected_path` is still the stored file.
    pub async fn clear_file(&self, id: Uuid, expected_path: &str) -> Result<u64, DbErr> {
        let result = attachment::Entity::update_many()
            .col_expr(attachment::Column::File, Expr::value(Option::<String>::None))
            .col_expr(attachment::Column::FileName, Expr::value(Option::<String>::None))
            .col_expr(attachment::Column::UploadedBy, Expr::value(Option::<Uuid>::None))
            .col_expr(
                attachment::Column::UploadedAt,
                Expr::value(Option::<NaiveDateTime>::None),
            )
            .col_expr(attachment::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
            .filter(attachment::Column::Id.eq(id))
            .filter(attachment::Column::File.eq(expected_path))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn is_shared_with(&self, attachment_id: Uuid, user_id: Uuid) -> Result<bool, DbErr> {
        let count = attachment_share::Entity::find()
            .filter(attachment_share::Column::AttachmentId.eq(attachment_id))
            .filter(attachment_share::Column::UserId.eq(user_id))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn shared_with_ids(&self, attachment_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        attachment_share::Entity::find()
            .select_only()
            .column(attachment_share::Column::UserId)
            .filter(attachment_share::Column::AttachmentId.eq(attachment_id))
            .into_tuple()
            .all(self.db)
            .await
    }

    pub async fn shared_with_ids_for(
        &self,
        attachment_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, DbErr> {
        let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if attachment_ids.is_empty() {
            return Ok(map);
        }
        let rows = attachment_share::Entity::find()
            .filter(attachment_share::Column::AttachmentId.is_in(attachment_ids.iter().copied()))
            .all(self.db)
            .await?;
        for row in rows {
            map.entry(row.attachment_id).or_default().push(row.user_id);
        }
        Ok(map)
    }

    /// Adds a share; an existing share is left as is.
    pub async fn add_share(&self, attachment_id: Uuid, user_id: Uuid) -> Result<(), DbErr> {
        attachment_share::Entity::insert(attachment_share::ActiveModel {
            attachment_id: Set(attachment_id),
            user_id: Set(user_id),
        })
        .on_conflict(
            OnConflict::columns([
                attachment_share::Column::AttachmentId,
                attachment_share::Column::UserId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(self.db)
        .await?;
        Ok(())
    }

    /// Replaces the share set.
    pub async fn set_shared_with(&self, attachment_id: Uuid, user_ids: &[Uuid]) -> Result<(), DbErr> {
        attachment_share::Entity::delete_many()
            .filter(attachment_share::Column::AttachmentId.eq(attachment_id))
            .exec(self.db)
            .await?;

        let mut unique = user_ids.to_vec();
        unique.sort();
        unique.dedup();
        if unique.is_empty() {
            return Ok(());
        }

        attachment_share::Entity::insert_many(unique.into_iter().map(|user_id| {
            attachment_share::ActiveModel {
                attachment_id: Set(attachment_id),
                user_id: Set(user_id),
            }
        }))
        .exec_without_returning(self.db)
        .await?;
        Ok(())
    }
}
