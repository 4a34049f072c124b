use juniper::GraphQLObject;

use super::models::{Location, Sport};

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A sport users can declare and match on")]
pub struct SportData {
    pub id: String,
    pub name: String,
}

impl From<Sport> for SportData {
    fn from(sport: Sport) -> Self {
        Self {
            id: sport.id.to_string(),
            name: sport.name,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A venue from the location directory")]
pub struct LocationData {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Location> for LocationData {
    fn from(location: Location) -> Self {
        Self {
            id: location.id.to_string(),
            name: location.name,
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}
