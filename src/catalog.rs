use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use crate::{
    entities::movie,
    error::{StoreError, StoreResult, is_unique_violation},
    models::{
        CatalogStatus, LastUpload, MovieEdit, MovieListEntry, MoviePage, NewMovie, Resolution,
        describe_elapsed,
    },
};

#[derive(Clone)]
pub struct MovieCatalog {
    db: DatabaseConnection,
}

impl MovieCatalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_movie(&self, new: NewMovie) -> StoreResult<movie::Model> {
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(new.title.clone()),
            poster_url: Set(new.poster_url),
            file_480p: Set(new.file_480p),
            file_720p: Set(new.file_720p),
            file_1080p: Set(new.file_1080p),
            uploaded_at: Set(Some(now_sec())),
        };

        let movie = model.insert(&self.db).await.map_err(|e| title_conflict(e, &new.title))?;
        debug!(id = movie.id, title = %movie.title, "movie created");
        Ok(movie)
    }

    pub async fn get_movie(&self, id: i32) -> StoreResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_by_title(&self, title: &str) -> StoreResult<Option<movie::Model>> {
        let movie =
            movie::Entity::find().filter(movie::Column::Title.eq(title)).one(&self.db).await?;
        Ok(movie)
    }

    /// Applies a rename and/or poster change in a single UPDATE.
    pub async fn edit_movie(&self, id: i32, edit: MovieEdit) -> StoreResult<movie::Model> {
        let current = self.require(id).await?;
        if edit.title.is_none() && edit.poster_url.is_none() {
            return Ok(current);
        }

        let mut active: movie::ActiveModel = current.into();
        if let Some(title) = &edit.title {
            active.title = Set(title.clone());
        }
        if let Some(poster_url) = edit.poster_url {
            active.poster_url = Set(Some(poster_url));
        }

        let movie = active.update(&self.db).await.map_err(|e| match &edit.title {
            Some(title) => title_conflict(e, title),
            None => e.into(),
        })?;
        debug!(id, title = %movie.title, "movie edited");
        Ok(movie)
    }

    /// Writes a single resolution column; the other two are not part of the UPDATE.
    pub async fn set_file(
        &self,
        id: i32,
        resolution: Resolution,
        file_ref: Option<String>,
    ) -> StoreResult<movie::Model> {
        let mut active: movie::ActiveModel = self.require(id).await?.into();
        active.set(resolution.column(), file_ref.into());

        let movie = active.update(&self.db).await?;
        debug!(id, resolution = %resolution, "movie file updated");
        Ok(movie)
    }

    pub async fn delete_movie(&self, id: i32) -> StoreResult<()> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(StoreError::MovieNotFound(id.to_string()));
        }
        debug!(id, "movie deleted");
        Ok(())
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(movie::Entity::find().count(&self.db).await?)
    }

    /// Titles in alphabetical order, one 1-based page at a time.
    pub async fn list_page(&self, page: u64, page_size: u64) -> StoreResult<MoviePage> {
        let page = page.max(1);
        let page_size = page_size.max(1);

        let paginator =
            movie::Entity::find().order_by_asc(movie::Column::Title).paginate(&self.db, page_size);
        let counts = paginator.num_items_and_pages().await?;
        let total_pages = counts.number_of_pages;

        // Pages past the end are empty and never fetched.
        let offset = (page - 1).checked_mul(page_size).filter(|_| page <= total_pages);
        let movies = match offset {
            Some(_) => paginator.fetch_page(page - 1).await?,
            None => Vec::new(),
        };
        let offset = offset.unwrap_or_default();

        let entries = movies
            .into_iter()
            .enumerate()
            .map(|(i, m)| MovieListEntry { position: offset + i as u64 + 1, title: m.title })
            .collect::<Vec<_>>();

        debug!(
            page,
            offset,
            total_movies = counts.number_of_items,
            total_pages,
            on_page = entries.len(),
            "movie list page"
        );

        Ok(MoviePage {
            page,
            page_size,
            total_pages,
            total_movies: counts.number_of_items,
            entries,
        })
    }

    pub async fn latest(&self) -> StoreResult<Option<movie::Model>> {
        let movie = movie::Entity::find().order_by_desc(movie::Column::Id).one(&self.db).await?;
        Ok(movie)
    }

    pub async fn status(&self) -> StoreResult<CatalogStatus> {
        let total_movies = self.count().await?;
        let last_upload = self.latest().await?.map(|m| LastUpload {
            ago: m.uploaded_at.map(|at| describe_elapsed(now_sec() - at)),
            uploaded_at: m.uploaded_at,
            title: m.title,
        });

        Ok(CatalogStatus { total_movies, last_upload })
    }

    async fn require(&self, id: i32) -> StoreResult<movie::Model> {
        self.get_movie(id).await?.ok_or_else(|| StoreError::MovieNotFound(id.to_string()))
    }
}

fn title_conflict(err: sea_orm::DbErr, title: &str) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::DuplicateTitle(title.to_string())
    } else {
        StoreError::Db(err)
    }
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}
