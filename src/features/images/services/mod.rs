pub mod image_proxy_service;

pub use image_proxy_service::{
    ImageFetcher, ImageProxyError, ImageProxyService, ProxiedImage, ReqwestImageFetcher,
};
