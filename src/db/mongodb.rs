use mongodb::bson::doc;
use mongodb::sync::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use super::storage::{KeyValueStorage, StorageError, StorageResult};

/// Documento guardado por clave: el snapshot va como cadena JSON, igual
/// que en cualquier otro medio.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoredEntry {
    #[serde(rename = "_id")]
    pub key: String,
    pub value: String,
    pub updated_at: i64, // timestamp unix
}

#[derive(Debug, Clone)]
pub struct MongoStorage {
    pub client: Client,
    pub database: Database,
}

impl MongoStorage {
    /// Conecta con el driver síncrono y comprueba la conexión con un `ping`.
    ///
    /// No se debe llamar desde un hilo del runtime async: el driver síncrono
    /// bloquea.
    pub fn connect(uri: &str, database_name: &str) -> StorageResult<MongoStorage> {
        let client = Client::with_uri_str(uri)
            .map_err(|e| StorageError::database("connect", e))?;

        let database = client.database(database_name);

        // Test connection
        database
            .run_command(doc! {"ping": 1})
            .run()
            .map_err(|e| StorageError::database("ping", e))?;

        tracing::info!(database = %database_name, "Conexión a MongoDB establecida exitosamente");

        Ok(MongoStorage { client, database })
    }

    pub fn entries(&self) -> Collection<StoredEntry> {
        self.database.collection("day_snapshots")
    }

    // Función auxiliar para obtener timestamp actual
    pub fn current_timestamp() -> i64 {
        chrono::Utc::now().timestamp()
    }
}

impl KeyValueStorage for MongoStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entry = self
            .entries()
            .find_one(doc! { "_id": key })
            .run()
            .map_err(|e| StorageError::database("find_one", e))?;

        Ok(entry.map(|entry| entry.value))
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let entry = StoredEntry {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: Self::current_timestamp(),
        };

        self.entries()
            .replace_one(doc! { "_id": key }, entry)
            .upsert(true)
            .run()
            .map_err(|e| StorageError::database("replace_one", e))?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.entries()
            .delete_one(doc! { "_id": key })
            .run()
            .map_err(|e| StorageError::database("delete_one", e))?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    #[test]
    fn stored_entry_uses_key_as_document_id() {
        let entry = StoredEntry {
            key: "bosco:v1:Jueves".to_string(),
            value: r#"{"guestList":["Ana"]}"#.to_string(),
            updated_at: 1_741_295_045,
        };

        let document = bson::to_document(&entry).unwrap();
        assert_eq!(document.get_str("_id").unwrap(), "bosco:v1:Jueves");
        assert_eq!(document.get_str("value").unwrap(), r#"{"guestList":["Ana"]}"#);
        assert_eq!(document.get_i64("updated_at").unwrap(), 1_741_295_045);
        assert!(!document.contains_key("key"));

        let back: StoredEntry = bson::from_document(document).unwrap();
        assert_eq!(back.key, entry.key);
    }

    // Necesita un MongoDB accesible en MONGODB_URI:
    // MONGODB_URI=mongodb://localhost:27017 cargo test -- --ignored
    #[test]
    #[ignore]
    fn round_trip_against_live_server() {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database = format!("bosco_tables_test_{}", uuid::Uuid::new_v4().simple());
        let mut storage = MongoStorage::connect(&uri, &database).unwrap();
        let key = "bosco:v1:Sabado";

        assert_eq!(storage.get(key).unwrap(), None);

        storage.set(key, r#"{"guestList":["A"]}"#).unwrap();
        assert_eq!(storage.get(key).unwrap().as_deref(), Some(r#"{"guestList":["A"]}"#));

        // una segunda escritura reemplaza el documento
        storage.set(key, r#"{"guestList":["B"]}"#).unwrap();
        assert_eq!(storage.get(key).unwrap().as_deref(), Some(r#"{"guestList":["B"]}"#));

        storage.remove(key).unwrap();
        assert_eq!(storage.get(key).unwrap(), None);
        storage.remove(key).unwrap();

        storage.database.drop().run().unwrap();
    }
}
