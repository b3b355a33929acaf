use log::info;

use crate::database::{JsonCollection, JsonStore};
use crate::post::post_model::{Post, PostPayload};
use crate::post::post_query;
use crate::utils::error::CustomError;
use crate::utils::validation::FieldViolation;

pub const POSTS: &str = "posts";

pub struct PostService {
    collection: JsonCollection<Post>,
}

impl PostService {
    pub fn new(store: &JsonStore) -> Self {
        let collection = store.collection::<Post>(POSTS);
        PostService { collection }
    }

    /// Sorted page of posts, optionally narrowed to a tag or author.
    pub async fn list_posts(
        &self,
        page: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Vec<Post>, CustomError> {
        let page = post_query::parse_page(page)?;
        let posts = self.collection.load().await?;

        let page = post_query::list_page(posts, page);
        Ok(post_query::filter_by_tag_or_author(page, filter))
    }

    pub async fn search_posts(&self, query: Option<&str>) -> Result<Vec<Post>, CustomError> {
        let posts = self.collection.load().await?;
        Ok(post_query::search_by_title(posts, query))
    }

    pub async fn all_posts(&self) -> Result<Vec<Post>, CustomError> {
        self.collection.load().await
    }

    pub async fn post_exists(&self, id: &str) -> Result<bool, CustomError> {
        let posts = self.collection.load().await?;
        Ok(posts.iter().any(|p| p.id == id))
    }

    /// Validates, stamps id and date, and stores the post at the front.
    pub async fn create_post(&self, payload: PostPayload) -> Result<Post, CustomError> {
        payload.check()?;
        let post = Post::from_payload(payload);

        let created = post.clone();
        self.collection
            .modify(move |posts| {
                posts.insert(0, post);
                Ok(())
            })
            .await?;

        info!("Created post {}", created.id);
        Ok(created)
    }

    pub async fn update_post(&self, id: &str, payload: PostPayload) -> Result<Post, CustomError> {
        let updated = self
            .collection
            .modify(|posts| {
                let post = posts
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| CustomError::NotFoundError("Post not found".into()))?;

                if payload.is_empty() {
                    return Err(CustomError::ValidationError(vec![FieldViolation::new(
                        "body",
                        "Request body cannot be empty",
                    )]));
                }
                payload.check()?;

                post.merge(payload);
                Ok(post.clone())
            })
            .await?;

        info!("Updated post {}", updated.id);
        Ok(updated)
    }

    pub async fn delete_post(&self, id: &str) -> Result<(), CustomError> {
        self.collection
            .modify(|posts| {
                let index = posts
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or_else(|| CustomError::NotFoundError("Post not found".into()))?;
                posts.remove(index);
                Ok(())
            })
            .await?;

        info!("Deleted post {}", id);
        Ok(())
    }
}
