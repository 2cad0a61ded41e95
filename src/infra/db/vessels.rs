use futures::TryStreamExt;

use crate::{
    application::repos::RepoError,
    domain::{
        entities::{VesselEntry, VesselList},
        types::PortId,
    },
};

use super::{PostgresRepositories, map_sqlx_error};

const CURRENT_VESSELS_SQL: &str = "SELECT llegada, buque, tipo, eslora, agente, partida, \
    sitio, sitio_imagen, num_buque \
    FROM vw_buques_en_puerto \
    WHERE num_puerto = $1 \
    ORDER BY llegada";

#[derive(sqlx::FromRow)]
struct VesselRow {
    llegada: String,
    buque: String,
    tipo: String,
    eslora: f64,
    agente: String,
    partida: Option<String>,
    sitio: String,
    sitio_imagen: String,
    num_buque: i32,
}

impl From<VesselRow> for VesselEntry {
    fn from(row: VesselRow) -> Self {
        Self {
            arrival: row.llegada,
            vessel: row.buque,
            kind: row.tipo,
            length: row.eslora,
            agent: row.agente,
            departure: row.partida.unwrap_or_default(),
            berth: row.sitio,
            berth_image: row.sitio_imagen,
            berth_code: row.num_buque,
        }
    }
}

impl PostgresRepositories {
    /// Stream the view row by row. Returning early (decode error, caller
    /// dropping the future) drops the stream, which closes the cursor before
    /// the connection goes back to the pool.
    pub(super) async fn stream_current_vessels(
        &self,
        port: PortId,
    ) -> Result<VesselList, RepoError> {
        let mut rows = sqlx::query_as::<_, VesselRow>(CURRENT_VESSELS_SQL)
            .bind(port.get())
            .fetch(self.pool());

        let mut vessels = Vec::new();
        while let Some(row) = rows.try_next().await.map_err(map_sqlx_error)? {
            vessels.push(VesselEntry::from(row));
        }
        Ok(vessels)
    }
}
