use crate::{PostId, Result, SnowflakeGenerator, TimeSource, UserId};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Post {
    pub id: PostId,
    pub author: UserId,
    pub content: String,
}

/// A post that has not been assigned an id yet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatePost {
    pub author: UserId,
    pub content: String,
}

impl CreatePost {
    pub fn new(author: UserId, content: impl Into<String>) -> Self {
        Self {
            author,
            content: content.into(),
        }
    }

    /// Mints the post's id.
    ///
    /// # Errors
    /// See [`SnowflakeGenerator::generate`].
    pub fn into_post<T: TimeSource>(self, generator: &SnowflakeGenerator<T>) -> Result<Post> {
        Ok(Post {
            id: generator.mint()?,
            author: self.author,
            content: self.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeneratorConfig, ProcessId, SystemClock};

    #[test]
    fn create_post_mints_an_id_from_the_generator_slot() {
        let config = GeneratorConfig::default().with_process_id(ProcessId::new(3).unwrap());
        let generator = SnowflakeGenerator::new(&config, SystemClock::default());
        let author = UserId::from_raw(77u64);

        let post = CreatePost::new(author, "hello")
            .into_post(&generator)
            .unwrap();

        assert_eq!(post.author, author);
        assert_eq!(post.content, "hello");
        assert_eq!(post.id.raw().process_id().get(), 3);
    }
}
