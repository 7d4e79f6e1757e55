//! Character repository backed by the player records REST service

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::{CharacterRepositoryPort, RepoError};
use crate::domain::entities::Character;
use crate::domain::value_objects::{
    AccountId, Attributes, CharacterClass, CharacterId, SpecialAbility,
};

/// Client for the `/player` routes
pub struct HttpCharacterRepository {
    client: Client,
    base_url: String,
}

impl HttpCharacterRepository {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/player{}", self.base_url, path)
    }

    async fn fetch(&self, path: &str) -> Result<Option<Character>, RepoError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let record: PlayerRecord = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| RepoError::Serialization(e.to_string()))?;
        Ok(Some(record.into_character()))
    }

    /// Send the stats and ability the records service does not take on create
    async fn store_details(
        &self,
        id: &CharacterId,
        character: &Character,
    ) -> Result<(), RepoError> {
        self.update(character).await?;
        if character.special_ability != SpecialAbility::Unassigned {
            self.assign_ability(id, character.special_ability).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CharacterRepositoryPort for HttpCharacterRepository {
    async fn create(&self, character: &Character) -> Result<CharacterId, RepoError> {
        let account_id = character
            .account_id
            .as_ref()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default();
        let request = CreatePlayerRequest {
            name: &character.name,
            class: character.class.as_str(),
            account_id,
        };

        let response = self
            .client
            .post(self.url("/player"))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;
        let created: PlayerRecord = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| RepoError::Serialization(e.to_string()))?;
        let id = created.id.map(CharacterId::from).ok_or(RepoError::MissingId)?;

        // The service creates records with zeroed stats and no abilities.
        let mut stored = character.clone();
        stored.id = Some(id.clone());
        if let Err(error) = self.store_details(&id, &stored).await {
            tracing::warn!(character_id = %id, error = %error, "Character record left incomplete");
            return Err(RepoError::Incomplete {
                id,
                reason: error.to_string(),
            });
        }

        tracing::debug!(character_id = %id, name = %character.name, "Created remote character");
        Ok(id)
    }

    async fn get(&self, id: &CharacterId) -> Result<Option<Character>, RepoError> {
        self.fetch(&format!("/{}", id)).await
    }

    async fn get_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Character>, RepoError> {
        self.fetch(&format!("/account/{}", account_id)).await
    }

    async fn update(&self, character: &Character) -> Result<(), RepoError> {
        let id = character.id.as_ref().ok_or(RepoError::MissingId)?;
        let response = self
            .client
            .patch(self.url(&format!("/{}/stats", id)))
            .json(&StatsPatch::from(character))
            .send()
            .await
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RepoError::NotFound(id.to_string()));
        }
        ensure_success(response).await?;
        Ok(())
    }

    async fn assign_ability(
        &self,
        id: &CharacterId,
        ability: SpecialAbility,
    ) -> Result<(), RepoError> {
        let response = self
            .client
            .post(self.url(&format!("/{}/abilities", id)))
            .json(&AbilityRecord {
                name: ability.name().to_string(),
                level: 1,
            })
            .send()
            .await
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RepoError::NotFound(id.to_string()));
        }
        ensure_success(response).await?;
        Ok(())
    }

    async fn patch_experience(&self, id: &CharacterId, delta: i64) -> Result<(), RepoError> {
        let response = self
            .client
            .patch(self.url(&format!("/{}/experience", id)))
            .query(&[("experience", delta)])
            .send()
            .await
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RepoError::NotFound(id.to_string()));
        }
        ensure_success(response).await?;
        Ok(())
    }
}

fn transport(error: reqwest::Error) -> RepoError {
    RepoError::Transport(error.to_string())
}

async fn ensure_success(response: Response) -> Result<Response, RepoError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|parsed| parsed.error)
        .unwrap_or(body);
    Err(RepoError::Transport(format!("{}: {}", status, message)))
}

/// Error payload the records service sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct CreatePlayerRequest<'a> {
    name: &'a str,
    class: &'a str,
    #[serde(rename = "accountId")]
    account_id: String,
}

#[derive(Debug, Serialize)]
struct StatsPatch {
    str: f64,
    dex: f64,
    vit: f64,
    int: f64,
    luk: f64,
    #[serde(rename = "freePoints")]
    free_points: u32,
}

impl From<&Character> for StatsPatch {
    fn from(character: &Character) -> Self {
        let attributes = &character.attributes;
        Self {
            str: attributes.strength,
            dex: attributes.dexterity,
            vit: attributes.vitality,
            int: attributes.intelligence,
            luk: attributes.luck,
            free_points: character.free_points,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AbilityRecord {
    name: String,
    #[serde(default = "default_level")]
    level: u32,
}

fn default_level() -> u32 {
    1
}

/// `accountId` arrives either as a bare id or populated with account details
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AccountRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
    },
}

/// A player document as the records service returns it
#[derive(Debug, Deserialize)]
struct PlayerRecord {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    name: String,
    class: String,
    #[serde(default)]
    str: f64,
    #[serde(default)]
    dex: f64,
    #[serde(default)]
    vit: f64,
    #[serde(default)]
    int: f64,
    #[serde(default)]
    luk: f64,
    #[serde(default)]
    experience: i64,
    #[serde(default)]
    level: Option<u32>,
    #[serde(rename = "freePoints", default)]
    free_points: Option<u32>,
    #[serde(default)]
    abilities: Vec<AbilityRecord>,
    #[serde(rename = "accountId", default)]
    account_id: Option<AccountRef>,
}

impl PlayerRecord {
    fn into_character(self) -> Character {
        let class = CharacterClass::from_name_lossy(&self.class);
        let attributes = Attributes::new(self.str, self.dex, self.vit, self.int, self.luk);
        let mut character = Character::new(self.name, class, attributes);

        if let Some(record) = self.abilities.first() {
            match SpecialAbility::from_name(&record.name) {
                Some(ability) => {
                    character = character.with_ability(ability);
                    if character.special_ability != ability {
                        tracing::warn!(
                            ability = %record.name,
                            class = %class,
                            "Ability on record is not available to class, using none"
                        );
                    }
                }
                None => {
                    tracing::warn!(ability = %record.name, "Unknown ability on record, using none");
                }
            }
        }

        character.id = self.id.map(CharacterId::from);
        character.account_id = self.account_id.map(|account| match account {
            AccountRef::Id(id) | AccountRef::Populated { id } => AccountId::from(id),
        });
        character.experience = self.experience;
        character.level = self.level.unwrap_or(1).max(1);
        // Records written before free points were stored have spent theirs.
        character.free_points = match self.free_points {
            Some(free_points) => free_points,
            None if character.attributes.total() > 0.0 => 0,
            None => Character::STARTING_FREE_POINTS,
        };
        character
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::*;
    use crate::domain::value_objects::AttributeKind;

    fn record(json: serde_json::Value) -> Character {
        serde_json::from_value::<PlayerRecord>(json)
            .unwrap()
            .into_character()
    }

    #[test]
    fn test_record_maps_to_character() {
        let character = record(serde_json::json!({
            "_id": "64f0c0ffee",
            "name": "Rook",
            "class": "Knight",
            "str": 12, "dex": 5, "vit": 9, "int": 1, "luk": 3,
            "experience": 150,
            "abilities": [{ "name": "Double Strike", "level": 1 }],
            "accountId": "acct-7"
        }));

        assert_eq!(character.id, Some(CharacterId::from("64f0c0ffee")));
        assert_eq!(character.account_id, Some(AccountId::from("acct-7")));
        assert_eq!(character.class, CharacterClass::Knight);
        assert_eq!(character.attributes, Attributes::new(12.0, 5.0, 9.0, 1.0, 3.0));
        assert_eq!(character.special_ability, SpecialAbility::DoubleStrike);
        assert_eq!(character.experience, 150);
        assert_eq!(character.level, 1);
    }

    #[test]
    fn test_populated_account_and_missing_fields() {
        let character = record(serde_json::json!({
            "_id": "p1",
            "name": "Elm",
            "class": "Druid",
            "accountId": { "_id": "acct-9", "username": "elm", "email": "elm@example.com" }
        }));

        assert_eq!(character.account_id, Some(AccountId::from("acct-9")));
        assert_eq!(character.attributes, Attributes::default());
        assert_eq!(character.special_ability, SpecialAbility::Unassigned);
    }

    #[test]
    fn test_ineligible_or_unknown_ability_maps_to_none() {
        let ineligible = record(serde_json::json!({
            "name": "Rook",
            "class": "Knight",
            "abilities": [{ "name": "Fireball" }]
        }));
        assert_eq!(ineligible.special_ability, SpecialAbility::Unassigned);

        let unknown = record(serde_json::json!({
            "name": "Ash",
            "class": "Sorcerer",
            "abilities": [{ "name": "Meteor" }]
        }));
        assert_eq!(unknown.special_ability, SpecialAbility::Unassigned);
    }

    #[test]
    fn test_error_body_parses() {
        let parsed: ErrorBody = serde_json::from_str(r#"{"error":"Player not found"}"#).unwrap();
        assert_eq!(parsed.error, "Player not found");
    }

    #[test]
    fn test_stats_patch_carries_free_points() {
        let mut character = Character::new(
            "Rook",
            CharacterClass::Knight,
            Attributes::new(1.0, 2.0, 3.0, 4.0, 5.0),
        );
        character.free_points = 7;

        let json = serde_json::to_value(StatsPatch::from(&character)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "str": 1.0, "dex": 2.0, "vit": 3.0, "int": 4.0, "luk": 5.0,
                "freePoints": 7
            })
        );
    }

    #[test]
    fn test_spent_points_survive_reload() {
        let mut stored = serde_json::json!({
            "_id": "p1",
            "name": "Rook",
            "class": "Knight",
            "str": 8, "dex": 4, "vit": 6, "int": 1, "luk": 1,
            "freePoints": 20
        });
        let mut character = record(stored.clone());
        character.allocate_points(AttributeKind::Str, 20).unwrap();

        // Apply the PATCH body to the stored document the way the service does.
        let patch = serde_json::to_value(StatsPatch::from(&character)).unwrap();
        for (key, value) in patch.as_object().unwrap() {
            stored[key] = value.clone();
        }
        let mut reloaded = record(stored);

        assert_eq!(reloaded.free_points, 0);
        assert_eq!(reloaded.attribute(AttributeKind::Str), 28.0);
        assert!(reloaded.allocate_points(AttributeKind::Str, 1).is_err());
    }

    #[test]
    fn test_missing_free_points_depend_on_stats() {
        let allocated = record(serde_json::json!({
            "name": "Rook",
            "class": "Knight",
            "str": 12, "dex": 5, "vit": 9, "int": 1, "luk": 3
        }));
        assert_eq!(allocated.free_points, 0);

        let fresh = record(serde_json::json!({ "name": "Elm", "class": "Druid" }));
        assert_eq!(fresh.free_points, Character::STARTING_FREE_POINTS);

        let explicit = record(serde_json::json!({
            "name": "Ash",
            "class": "Sorcerer",
            "str": 2, "dex": 4, "vit": 3, "int": 9, "luk": 2,
            "freePoints": 4
        }));
        assert_eq!(explicit.free_points, 4);
    }

    /// A request as the stub server received it
    #[derive(Debug)]
    struct Received {
        method: String,
        target: String,
        body: String,
    }

    /// Serve one canned `(status, body)` per connection, then hand back what
    /// was received.
    async fn stub_server(
        responses: Vec<(u16, &'static str)>,
    ) -> (HttpCharacterRepository, JoinHandle<Vec<Received>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut received = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                received.push(read_request(&mut socket).await);

                let reason = StatusCode::from_u16(status)
                    .ok()
                    .and_then(|code| code.canonical_reason())
                    .unwrap_or("Unknown");
                let reply = format!(
                    "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
            received
        });

        (HttpCharacterRepository::new(&base_url), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> Received {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let read = socket.read(&mut chunk).await.unwrap();
            assert!(read > 0, "connection closed before headers ended");
            buffer.extend_from_slice(&chunk[..read]);
            if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buffer.len() < header_end + content_length {
            let read = socket.read(&mut chunk).await.unwrap();
            assert!(read > 0, "connection closed before body ended");
            buffer.extend_from_slice(&chunk[..read]);
        }

        let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
        Received {
            method: request_line.next().unwrap_or_default().to_string(),
            target: request_line.next().unwrap_or_default().to_string(),
            body: String::from_utf8_lossy(&buffer[header_end..header_end + content_length])
                .to_string(),
        }
    }

    fn ranked_knight() -> Character {
        Character::new(
            "Rook",
            CharacterClass::Knight,
            Attributes::new(8.0, 4.0, 6.0, 1.0, 1.0),
        )
        .with_ability(SpecialAbility::DoubleStrike)
        .with_account(AccountId::from("acct-7"))
    }

    const CREATED: &str = r#"{"_id":"p1","name":"Rook","class":"Knight","accountId":"acct-7"}"#;

    #[tokio::test]
    async fn test_create_sends_record_stats_and_ability() {
        let (repo, server) = stub_server(vec![(201, CREATED), (200, "{}"), (201, "{}")]).await;

        let id = repo.create(&ranked_knight()).await.unwrap();

        assert_eq!(id, CharacterId::from("p1"));
        let received = server.await.unwrap();
        assert_eq!(received[0].method, "POST");
        assert_eq!(received[0].target, "/player/player");
        let created: serde_json::Value = serde_json::from_str(&received[0].body).unwrap();
        assert_eq!(created["accountId"], "acct-7");
        assert_eq!(created["class"], "Knight");

        assert_eq!(received[1].method, "PATCH");
        assert_eq!(received[1].target, "/player/p1/stats");
        let stats: serde_json::Value = serde_json::from_str(&received[1].body).unwrap();
        assert_eq!(stats["str"], 8.0);
        assert_eq!(stats["freePoints"], 20);

        assert_eq!(received[2].method, "POST");
        assert_eq!(received[2].target, "/player/p1/abilities");
        let ability: serde_json::Value = serde_json::from_str(&received[2].body).unwrap();
        assert_eq!(ability["name"], "Double Strike");
    }

    #[tokio::test]
    async fn test_create_reports_incomplete_record_with_its_id() {
        let (repo, server) = stub_server(vec![
            (201, CREATED),
            (500, r#"{"error":"Failed to update stats"}"#),
        ])
        .await;

        let err = repo.create(&ranked_knight()).await.unwrap_err();

        match err {
            RepoError::Incomplete { id, reason } => {
                assert_eq!(id, CharacterId::from("p1"));
                assert!(reason.contains("Failed to update stats"), "{}", reason);
            }
            other => panic!("expected an incomplete record, got {:?}", other),
        }
        // No ability is posted once the stats are rejected.
        assert_eq!(server.await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_patch_experience_sends_signed_query() {
        let (repo, server) = stub_server(vec![(200, "{}")]).await;

        repo.patch_experience(&CharacterId::from("p1"), -50)
            .await
            .unwrap();

        let received = server.await.unwrap();
        assert_eq!(received[0].method, "PATCH");
        assert_eq!(received[0].target, "/player/p1/experience?experience=-50");
    }

    #[tokio::test]
    async fn test_get_maps_not_found_to_none() {
        let (repo, server) = stub_server(vec![
            (404, r#"{"error":"Player not found"}"#),
            (200, CREATED),
        ])
        .await;

        assert!(repo.get(&CharacterId::from("gone")).await.unwrap().is_none());
        let found = repo.get(&CharacterId::from("p1")).await.unwrap().unwrap();
        assert_eq!(found.name, "Rook");

        let received = server.await.unwrap();
        assert_eq!(received[0].target, "/player/gone");
        assert_eq!(received[1].target, "/player/p1");
    }

    #[tokio::test]
    async fn test_update_sends_free_points_and_surfaces_errors() {
        let (repo, server) = stub_server(vec![
            (200, "{}"),
            (404, r#"{"error":"Player not found"}"#),
            (500, r#"{"error":"Database unavailable"}"#),
        ])
        .await;
        let mut character = ranked_knight();
        character.id = Some(CharacterId::from("p1"));
        character.allocate_points(AttributeKind::Vit, 5).unwrap();

        repo.update(&character).await.unwrap();
        assert!(matches!(
            repo.update(&character).await,
            Err(RepoError::NotFound(_))
        ));
        match repo.update(&character).await {
            Err(RepoError::Transport(message)) => {
                assert!(message.contains("Database unavailable"), "{}", message);
            }
            other => panic!("expected a transport error, got {:?}", other),
        }

        let received = server.await.unwrap();
        let stats: serde_json::Value = serde_json::from_str(&received[0].body).unwrap();
        assert_eq!(stats["vit"], 11.0);
        assert_eq!(stats["freePoints"], 15);
    }
}
