use log::info;

use crate::comment::model::{Comment, CommentPayload};
use crate::database::{JsonCollection, JsonStore};
use crate::post::post_model::Post;
use crate::post::post_service::POSTS;
use crate::utils::error::CustomError;

pub const COMMENTS: &str = "comments";

const POST_MISSING: &str = "Post with that id does not exist";

pub struct CommentService {
    collection: JsonCollection<Comment>,
    posts: JsonCollection<Post>,
}

impl CommentService {
    pub fn new(store: &JsonStore) -> Self {
        let collection = store.collection::<Comment>(COMMENTS);
        let posts = store.collection::<Post>(POSTS);
        CommentService { collection, posts }
    }

    /// Comments attached to `post_id`; an unknown post simply has none.
    pub async fn get_comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>, CustomError> {
        let comments = self.collection.load().await?;
        Ok(comments.into_iter().filter(|c| c.post_id == post_id).collect())
    }

    /// Validates the payload, then requires the post to exist before appending.
    pub async fn add_comment(
        &self,
        post_id: &str,
        payload: CommentPayload,
    ) -> Result<Comment, CustomError> {
        payload.check()?;
        self.ensure_post(post_id).await?;

        let comment = Comment::new(post_id, payload);
        let created = comment.clone();
        self.collection
            .modify(move |comments| {
                comments.push(comment);
                Ok(())
            })
            .await?;

        info!("Added comment {} to post {}", created.id, created.post_id);
        Ok(created)
    }

    /// The post must exist; the comment is then looked up by its own id.
    pub async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<(), CustomError> {
        self.ensure_post(post_id).await?;

        self.collection
            .modify(|comments| {
                let index = comments
                    .iter()
                    .position(|c| c.id == comment_id)
                    .ok_or_else(|| CustomError::NotFoundError("Comment not found".into()))?;
                comments.remove(index);
                Ok(())
            })
            .await?;

        info!("Deleted comment {} from post {}", comment_id, post_id);
        Ok(())
    }

    async fn ensure_post(&self, post_id: &str) -> Result<(), CustomError> {
        let posts = self.posts.load().await?;
        if posts.iter().any(|p| p.id == post_id) {
            Ok(())
        } else {
            Err(CustomError::NotFoundError(POST_MISSING.into()))
        }
    }
}
