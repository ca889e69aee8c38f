use redis::{aio::MultiplexedConnection, Client, FromRedisValue, RedisError};

pub struct RedisService {
    connection: MultiplexedConnection,
}

impl RedisService {
    pub async fn new(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = client.get_multiplexed_async_connection().await?;

        Ok(Self { connection })
    }

    pub async fn execute_pipe<T: FromRedisValue>(
        &self,
        pipe: redis::Pipeline,
    ) -> Result<T, RedisError> {
        let mut connection = self.connection.clone();
        pipe.query_async(&mut connection).await
    }

    pub async fn zrevrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<String>, RedisError> {
        let mut connection = self.connection.clone();
        redis::cmd("ZREVRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .query_async(&mut connection)
            .await
    }

    pub async fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>, RedisError> {
        let mut connection = self.connection.clone();
        redis::cmd("ZSCORE")
            .arg(key)
            .arg(member)
            .query_async(&mut connection)
            .await
    }

    pub async fn zcard(&self, key: &str) -> Result<i64, RedisError> {
        let mut connection = self.connection.clone();
        redis::cmd("ZCARD")
            .arg(key)
            .query_async(&mut connection)
            .await
    }
}
